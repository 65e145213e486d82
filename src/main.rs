use clap::Parser;
use ikuuu_checkin::{
    config::{FileConfig, Opts},
    report::{Report, Summary},
};
use log::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let opts = Opts::parse();
    let file = FileConfig::load(opts.config.as_deref())?;
    let accounts = opts.accounts(&file)?;
    println!("Found {} account(s)", accounts.len());

    let runner = opts.runner(&file);
    info!("Mirror candidates: {:?}", runner.mirrors);

    let mut succeeded = 0;
    for account in &accounts {
        println!("\nProcessing account: {}", account.email);
        let outcome = runner.check_in(account).await;
        if outcome.is_success() {
            succeeded += 1;
        }
        print!("{}", Report(&outcome));
    }
    println!(
        "\n{}",
        Summary {
            total: accounts.len(),
            succeeded,
        }
    );

    Ok(())
}
