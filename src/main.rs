use portprobe::args::get_config;
use portprobe::core::Scanner;
use portprobe::logging;

#[tokio::main]
async fn main() {
    let config = match get_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(e.exit_code());
        }
    };

    logging::init(config.verbose);

    let scanner = Scanner::new(config);
    if let Err(e) = scanner.exec().await {
        println!("{}", e);
        std::process::exit(e.exit_code());
    }
}
