use eventsite::startup;

fn main() -> miette::Result<()> {
    startup::init_logging()?;

    let config = startup::load_site_config()?;
    startup::run_build(&config)?;
    Ok(())
}
