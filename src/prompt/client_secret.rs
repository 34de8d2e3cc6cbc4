use inquire::{Password, PasswordDisplayMode};

pub fn client_secret(client_id: &str) -> inquire::error::InquireResult<String> {
    Password::new(&format!("Client secret for {client_id}"))
        .with_display_mode(PasswordDisplayMode::Hidden)
        .without_confirmation()
        .prompt()
}
