fn main() {
    if let Err(e) = nekotool::cli::main() {
        eprintln!("❌ {e}");
        std::process::exit(1);
    }
}
