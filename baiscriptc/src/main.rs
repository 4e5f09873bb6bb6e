//! Thin entry point: `main()` sequences nothing itself, it just hands off
//! to the driver and reports the exit code, the way a `vasm`-style binary
//! calls into an inner function rather than inlining its body.

fn main() {
    std::process::exit(baiscriptc::run());
}
