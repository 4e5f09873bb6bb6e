//! Driver logic for the `baiscriptc` binary: reads `input.txt`, runs the
//! `baiscript`/`baiasm` pipeline, and writes the seven output artifacts
//! the reference `main()` produces — gating later phases on earlier error
//! counts the way it does, but as a library function instead of one
//! monolithic `main`.

use baiscript::semantic::Severity;
use baiscript::tac::Instr;
use baiscript::CompileOutcome;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

const OUTPUT_FILES: &[&str] = &[
    "output_print.txt",
    "output_tac.txt",
    "output_assembly.txt",
    "output_machine.txt",
    "output_machine_assembly.txt",
    "output_machine_bin.txt",
    "output_machine_hex.txt",
];

/// Truncates every output artifact to empty, the way the reference's
/// `initialize_output_files` clears stale results from a prior run before
/// the new one starts.
fn initialize_output_files() -> io::Result<()> {
    for name in OUTPUT_FILES {
        write_file(name, "")?;
    }
    Ok(())
}

fn write_file(name: &str, contents: &str) -> io::Result<()> {
    File::create(name)?.write_all(contents.as_bytes())
}

fn write_error_to_all(message: &str) {
    for name in OUTPUT_FILES {
        if let Err(err) = write_file(name, &format!("{}\n", message)) {
            eprintln!("ERROR: cannot write {}: {}", name, err);
        }
    }
}

fn render_tac(instrs: &[Instr]) -> String {
    instrs.iter().map(|i| format!("{}\n", i)).collect()
}

/// Runs the full pipeline against `input.txt` in the current directory and
/// returns the process exit code (0 success, 1 otherwise), mirroring the
/// reference `main()`'s staged `=== ... ===` progress narration on stderr.
pub fn run() -> i32 {
    eprintln!("=== BaiScript IS PARSING! ===\n");

    if let Err(err) = initialize_output_files() {
        eprintln!("ERROR: cannot initialize output files: {}", err);
        return 1;
    }

    let input_path = Path::new("input.txt");
    let source = match std::fs::read_to_string(input_path) {
        Ok(s) => s,
        Err(_) => {
            eprintln!("Error: unable to open input.txt");
            let msg = "Error: unable to open input.txt";
            write_error_to_all(msg);
            return 1;
        }
    };

    let outcome = baiscript::compile(&source);

    let parse_failure = match &outcome {
        CompileOutcome::LexError(e) => Some((e.message.clone(), e.line)),
        CompileOutcome::ParseError(e) => Some((e.message.clone(), e.line)),
        CompileOutcome::Analyzed { .. } => None,
    };
    if let Some((message, line)) = parse_failure {
        eprintln!("[PARSE] Failed - writing error messages to output files");
        eprintln!("\n=== BaiScript IS PARSED! ===");
        write_error_to_all("No assembly generated due to parse errors.");
        let _ = write_file(
            "output_print.txt",
            &format!("[SEM ERROR] {} [line:{}]\n[MAIN] Compilation failed due to parse errors.\n", message, line),
        );
        eprintln!("\n\n[MAIN] Compilation failed with errors");
        return 1;
    }
    let (analysis, tac, optimized_tac) = match outcome {
        CompileOutcome::Analyzed { analysis, tac, optimized_tac } => (analysis, tac, optimized_tac),
        _ => unreachable!("parse_failure already handled LexError/ParseError above"),
    };

    eprintln!("[PARSE] Accepted\n");
    eprintln!("\n=== BaiScript IS PARSED! ===");

    let warning_count = analysis.diagnostics.iter().filter(|d| d.severity == Severity::Warning).count();

    eprintln!("\n=== BaiScript SEMANTIC ANALYSIS ===\n");
    if analysis.error_count == 0 {
        eprintln!("[MAIN] Semantic analysis passed.");
        eprintln!("[SEM] Analysis completed: no semantic errors (warnings: {})", warning_count);
    } else {
        eprintln!("[MAIN] Semantic analysis failed with {} error(s).", analysis.error_count);
        eprintln!("[SEM] Analysis completed: {} semantic error(s), {} warning(s)", analysis.error_count, warning_count);
    }
    eprintln!("\n=== BaiScript SEMANTIC ANALYSIS ENDED ===\n");

    let print_report = render_print_output(&analysis);
    if let Err(err) = write_file("output_print.txt", &print_report) {
        eprintln!("ERROR: cannot write output_print.txt: {}", err);
    }

    eprintln!("\n=== BaiScript INTERMEDIATE CODE GENERATION ===\n");
    if analysis.error_count > 0 {
        eprintln!("[MAIN] Skipping intermediate code generation due to semantic errors.");
        let msg = format!("No TAC generated due to {} semantic error(s).", analysis.error_count);
        let _ = write_file("output_tac.txt", &format!("{}\n", msg));
    } else {
        let report = format!(
            "=== UNOPTIMIZED TAC ===\n{}=== END UNOPTIMIZED TAC ===\n\n=== OPTIMIZED TAC ===\n{}=== END OPTIMIZED TAC ===\n",
            render_tac(&tac),
            render_tac(&optimized_tac),
        );
        let _ = write_file("output_tac.txt", &report);
        eprintln!("[MAIN] Intermediate code generation completed.");
    }
    eprintln!("\n=== BaiScript INTERMEDIATE CODE GENERATION ENDED ===\n");

    eprintln!("\n=== BaiScript TARGET CODE GENERATION ===\n");
    eprintln!("\n=== BaiScript MACHINE CODE GENERATION ===\n");
    if analysis.error_count > 0 {
        eprintln!("[MAIN] Skipping target code generation due to semantic errors.");
        eprintln!("[MAIN] Skipping machine code generation due to semantic errors.");
        let msg = "No assembly generated due to semantic errors.";
        let _ = write_file("output_assembly.txt", &format!("{}\n", msg));
        let machine_msg = "No machine code generated due to semantic errors.";
        for name in &["output_machine.txt", "output_machine_assembly.txt", "output_machine_bin.txt", "output_machine_hex.txt"] {
            let _ = write_file(name, &format!("{}\n", machine_msg));
        }
    } else {
        match baiasm::assemble(&optimized_tac, &analysis.symbols) {
            Ok(assembled) => {
                let _ = write_file("output_assembly.txt", &assembled.assembly_text);
                eprintln!("[MAIN] Target code generation completed.");

                let mut combined = String::new();
                let mut assembly_only = String::new();
                let mut bin_only = String::new();
                let mut hex_only = String::new();
                for line in &assembled.encoded {
                    combined.push_str(&format!("{:<25} -> {} (0x{:08X})\n", line.source, line.binary, line.word));
                    assembly_only.push_str(&format!("{}\n", line.source));
                    bin_only.push_str(&format!("{}\n", line.binary));
                    hex_only.push_str(&format!("{}\n", line.hex));
                }
                let _ = write_file("output_machine.txt", &combined);
                let _ = write_file("output_machine_assembly.txt", &assembly_only);
                let _ = write_file("output_machine_bin.txt", &bin_only);
                let _ = write_file("output_machine_hex.txt", &hex_only);
                eprintln!("[MAIN] Machine code generation completed.");
            }
            Err(err) => {
                eprintln!("[MAIN] Machine code generation failed: {}", err);
                let msg = format!("No machine code generated: {}", err);
                for name in &["output_machine.txt", "output_machine_assembly.txt", "output_machine_bin.txt", "output_machine_hex.txt"] {
                    let _ = write_file(name, &format!("{}\n", msg));
                }
            }
        }
    }
    eprintln!("\n=== BaiScript TARGET CODE GENERATION ENDED ===\n");
    eprintln!("\n=== BaiScript MACHINE CODE GENERATION ENDED ===\n");

    eprintln!("\n=== BaiScript SYMBOL TABLE ===\n");
    eprintln!("{}", analysis.symbols);

    if analysis.error_count > 0 {
        eprintln!("\n\n[MAIN] Compilation failed with errors");
        1
    } else {
        eprintln!("\n\n[MAIN] Compilation successful\n");
        0
    }
}

/// Renders `output_print.txt`'s contents: PRENT output plus, on a clean
/// run, the success banner and `[SEM]` summary; on a failed run, the
/// `[SEM ERROR]`/`[SEM WARNING]` diagnostic lines instead.
fn render_print_output(analysis: &baiscript::semantic::AnalysisResult) -> String {
    if analysis.error_count == 0 {
        let mut out = analysis.print_output.clone().unwrap_or_default();
        for d in &analysis.diagnostics {
            if d.severity == Severity::Warning {
                out.push_str(&format!("{}\n", d));
            }
        }
        out.push_str("=== COMPILATION SUCCESSFULL ===\n");
        let warning_count = analysis.diagnostics.iter().filter(|d| d.severity == Severity::Warning).count();
        out.push_str(&format!(
            "[SEM] Analysis completed: no semantic errors (warnings: {})\n",
            warning_count,
        ));
        out
    } else {
        let mut out = String::new();
        for d in &analysis.diagnostics {
            out.push_str(&format!("{}\n", d));
        }
        out
    }
}
