// Usage: casework selfcheck [--filter REGEX] [--config FILE] [--json] [--no-color] [--fail-fast]

fn main() {
    env_logger::init();
    std::process::exit(casework::cli::run());
}
