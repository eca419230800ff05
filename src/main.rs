use git_depgraph::App;
use git_depgraph::Config;

fn main() -> miette::Result<()> {
    let config = Config::new()?;
    App::new(config).run()
}
