mod cli;
mod layout;
mod logging;
mod report;
mod runner;
mod scaffold;
mod templates;
mod tree;
mod util;

fn main() -> anyhow::Result<()> {
    let app = cli::parse();
    logging::init(app.verbose);
    runner::run(app)
}
