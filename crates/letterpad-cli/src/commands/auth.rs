use super::App;
use anyhow::Result;

pub fn whoami(app: &App) -> Result<()> {
    if let Some(user) = app.store.current_user() {
        println!("{}", user.id);
    }
    Ok(())
}

pub fn print_login_hint(app: &App) {
    eprintln!("Not signed in. Log in at: {}", app.store.login_url());
}
