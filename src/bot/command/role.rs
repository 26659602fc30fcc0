use serenity::all::{
    CommandInteraction, CommandOptionType, Context, CreateCommand, CreateCommandOption,
    Permissions,
};

use crate::{
    data::discord::user::role_ref,
    error::command::CommandError,
    model::role::RoleRef,
    service::settings::SettingsService,
    state::AppState,
};

use super::{require_admin, respond, role_option};

pub const NAME: &str = "set-role";

pub fn register() -> CreateCommand {
    CreateCommand::new(NAME)
        .description("Set the role that can run the `/select` and `/set-emoji` commands")
        .default_member_permissions(Permissions::ADMINISTRATOR)
        .add_option(
            CreateCommandOption::new(CommandOptionType::Role, "role", "The moderator role")
                .required(true),
        )
}

pub async fn run(ctx: &Context, state: &AppState, command: &CommandInteraction) -> Result<(), CommandError> {
    require_admin(command)?;

    let role_id = role_option(command, "role").ok_or_else(|| CommandError::user("No role given"))?;
    let role = command
        .data
        .resolved
        .roles
        .get(&role_id)
        .map(role_ref)
        .unwrap_or_else(|| RoleRef {
            id: role_id.get(),
            name: role_id.to_string(),
        });

    let message = SettingsService::new(&state.emoji, &state.role)
        .apply_role(role)
        .await?;

    respond(ctx, command, message).await
}
