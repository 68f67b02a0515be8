//! The `folio` binary.

use clap::Parser;

use folio_cli::{CliArgs, FolioApp};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    let app = match FolioApp::from_args("folio", &args) {
        Ok(app) => app,
        Err(error) => {
            eprintln!("folio: {error}");
            std::process::exit(1);
        }
    };

    match app.run(args).await {
        Ok(code) => std::process::exit(code),
        Err(error) => {
            eprintln!("folio: {error}");
            std::process::exit(1);
        }
    }
}
