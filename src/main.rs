fn main() {
    if let Err(err) = maskcoco::run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
