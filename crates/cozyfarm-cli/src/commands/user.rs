//! Farm owner commands.

use serde_json::json;

use super::{open_farm, print_json};

pub fn init() -> Result<(), Box<dyn std::error::Error>> {
    let (mut farm, _) = open_farm()?;
    let created = farm.initialize_user()?;
    print_json(&json!({
        "created": created,
        "user": farm.user(),
    }))
}

pub fn onboard() -> Result<(), Box<dyn std::error::Error>> {
    let (mut farm, _) = open_farm()?;
    if farm.user().is_none() {
        return Err("no user yet, run `init` first".into());
    }
    farm.complete_onboarding()?;
    print_json(&farm.user())
}
