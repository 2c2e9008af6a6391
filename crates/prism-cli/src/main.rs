fn main() {
    let exit_code = prism_cli::run_from_env();
    std::process::exit(exit_code);
}
