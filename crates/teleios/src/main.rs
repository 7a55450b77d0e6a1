//! `teleios <yaml-config-path>` — process entry point.

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let mut subsystems: Vec<Box<dyn teleios::Subsystem>> = Vec::new();
    let code = teleios::run(&args, &mut subsystems);
    std::process::exit(code);
}
