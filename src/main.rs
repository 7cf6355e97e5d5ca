mod cli;
mod commands;
mod digest;
mod env_loader;
mod error;
mod warn;

const EXIT_FAILURE: i32 = 2;

fn main() {
    env_loader::load_dotenv();

    match cli::run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            println!("Error: {err:#}");
            std::process::exit(EXIT_FAILURE);
        }
    }
}
