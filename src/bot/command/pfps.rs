use serenity::all::{
    CommandInteraction, CommandOptionType, Context, CreateCommand, CreateCommandOption,
    Permissions, UserId,
};

use crate::{
    data::discord::{user::user_avatar, InteractionResponder},
    error::command::CommandError,
    service::{
        pfps::{parse_user_list, AnimatedAvatarFormat, AvatarFormat, AvatarOptions, PfpsService},
        response::ResponseAssembler,
    },
    state::AppState,
};

use super::{bool_option, defer, require_admin, string_option};

pub const NAME: &str = "pfps";

const LISTING_FILE_NAME: &str = "userlist.txt";

pub fn register() -> CreateCommand {
    let mut format = CreateCommandOption::new(
        CommandOptionType::String,
        "format",
        "The image format for non-animated profile pictures",
    );
    for (name, value) in AvatarFormat::CHOICES {
        format = format.add_string_choice(name, value);
    }

    let mut animated_format = CreateCommandOption::new(
        CommandOptionType::String,
        "animated_format",
        "The image format for animated profile pictures",
    );
    for (name, value) in AnimatedAvatarFormat::CHOICES {
        animated_format = animated_format.add_string_choice(name, value);
    }

    CreateCommand::new(NAME)
        .description("Get the profile pictures of one or multiple users in bulk")
        .default_member_permissions(Permissions::ADMINISTRATOR)
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::String,
                "users",
                "The users of whom you want to download their profile pictures",
            )
            .required(true),
        )
        .add_option(format)
        .add_option(CreateCommandOption::new(
            CommandOptionType::Boolean,
            "animated",
            "Do you want animated profile pictures, or should they all be non-animated?",
        ))
        .add_option(animated_format)
}

pub async fn run(ctx: &Context, state: &AppState, command: &CommandInteraction) -> Result<(), CommandError> {
    require_admin(command)?;

    let user_ids = parse_user_list(string_option(command, "users").unwrap_or_default())?;
    let options = AvatarOptions {
        format: string_option(command, "format")
            .and_then(AvatarFormat::from_choice)
            .unwrap_or_default(),
        animated: bool_option(command, "animated").unwrap_or(false),
        animated_format: string_option(command, "animated_format")
            .and_then(AnimatedAvatarFormat::from_choice)
            .unwrap_or_default(),
    };

    defer(ctx, command).await?;

    let mut users = Vec::with_capacity(user_ids.len());
    for id in user_ids {
        if id == 0 {
            return Err(CommandError::user("Input `0` could not be parsed"));
        }
        let user = ctx.http.get_user(UserId::new(id)).await?;
        users.push(user_avatar(&user));
    }

    let dest_dir = state.paths.pfps.join(command.id.to_string());
    let outcome = PfpsService::new(&state.http)
        .run(&users, &dest_dir, &options)
        .await?;

    let responder = InteractionResponder::new(ctx.http.clone(), command.clone());
    let sent = ResponseAssembler::new(LISTING_FILE_NAME)
        .send(&responder, &outcome.stats, &outcome.listing, outcome.archive.as_deref())
        .await;

    tracing::info!("/pfps for {} users finished: {:?}", users.len(), sent);
    Ok(())
}
