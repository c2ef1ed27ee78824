use std::str::FromStr;

use serenity::{
    all::{ChannelType, CommandInteraction, CommandOptionType, Permissions},
    builder::{CreateCommand, CreateCommandOption, CreateEmbed},
};
use tracing::error;

use crate::common::options::Options;
use crate::database::settings::{CustomMessage, WelcomerDirection};
use crate::models::{
    command::{Command, CommandContext, CommandContextReply},
    handler::Handler,
    response::{Response, ResponseError, ResponseResult},
};

const EMBED_COLOR: u32 = 0x78b159;

fn direction_option() -> CreateCommandOption {
    CreateCommandOption::new(
        CommandOptionType::String,
        "direction",
        "Whether this applies to joins or leaves",
    )
    .add_string_choice("welcome", "welcome")
    .add_string_choice("leave", "leave")
    .required(true)
}

pub struct WelcomerCommand;

#[async_trait::async_trait]
impl Command for WelcomerCommand {
    fn name(&self) -> &'static str {
        "welcomer"
    }

    fn register(&self) -> CreateCommand {
        CreateCommand::new("welcomer")
            .description("Welcome and leave announcement settings")
            .default_member_permissions(Permissions::MANAGE_GUILD)
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::SubCommand,
                    "channel",
                    "Set the channel announcements are sent to",
                )
                .add_sub_option(direction_option())
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::Channel,
                        "channel",
                        "The channel to announce in",
                    )
                    .channel_types(vec![ChannelType::Text])
                    .required(true),
                ),
            )
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::SubCommand,
                    "message",
                    "Set a custom announcement message",
                )
                .add_sub_option(direction_option())
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::String,
                        "title",
                        "Embed title ({user}, {user_name}, {server}, {member_count})",
                    )
                    .required(true),
                )
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::String,
                        "description",
                        "Embed description, same placeholders as the title",
                    )
                    .required(true),
                )
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::String,
                        "image",
                        "Image URL for the embed",
                    )
                    .required(false),
                ),
            )
    }

    async fn router(
        &self,
        handler: &Handler,
        ctx: &CommandContext,
        command: &CommandInteraction,
    ) -> ResponseResult {
        let options = Options {
            options: command.data.options(),
        };
        let Some(direction_name) = options.get_string("direction").into_owned() else {
            return Err(ResponseError::Execution(
                "Could not get a direction",
                Some("Please notify the developer of this issue".to_string()),
            ));
        };
        let Ok(direction) = WelcomerDirection::from_str(&direction_name) else {
            return Err(ResponseError::Execution(
                "Invalid direction",
                Some("Use `welcome` or `leave`.".to_string()),
            ));
        };

        let resolved = command.data.options();
        match resolved.first().map(|option| option.name) {
            Some("channel") => set_channel(handler, ctx, command, &options, direction).await,
            Some("message") => set_message(handler, ctx, command, &options, direction).await,
            _ => Err(ResponseError::Execution(
                "Invalid welcomer command",
                Some("Please use one of the welcomer subcommands.".to_string()),
            )),
        }
    }
}

async fn set_channel(
    handler: &Handler,
    ctx: &CommandContext,
    cmd: &CommandInteraction,
    options: &Options<'_>,
    direction: WelcomerDirection,
) -> ResponseResult {
    let Some(channel) = options.get_channel("channel").into_owned() else {
        return Err(ResponseError::Execution(
            "Could not get a channel",
            Some("Please notify the developer of this issue".to_string()),
        ));
    };

    if let Err(err) = handler
        .settings
        .set_channel(ctx.guild.id, direction, channel.id)
    {
        error!("Could not save welcomer settings, failed with error: {err:?}");
        return Err(ResponseError::Execution(
            "Could not save welcomer settings",
            Some("Please try again later.".to_string()),
        ));
    }

    ctx.reply(
        cmd,
        Response::new()
            .embed(
                CreateEmbed::new()
                    .title("Welcomer updated")
                    .description(format!(
                        "{direction} announcements will be sent in <#{}>.",
                        channel.id
                    ))
                    .color(EMBED_COLOR),
            )
            .ephemeral(true),
    )
    .await
}

async fn set_message(
    handler: &Handler,
    ctx: &CommandContext,
    cmd: &CommandInteraction,
    options: &Options<'_>,
    direction: WelcomerDirection,
) -> ResponseResult {
    let (Some(title), Some(description)) = (
        options.get_string("title").into_owned(),
        options.get_string("description").into_owned(),
    ) else {
        return Err(ResponseError::Execution(
            "Could not get the message template",
            Some("Please notify the developer of this issue".to_string()),
        ));
    };
    let image = options.get_string("image").into_owned();

    if let Err(err) = handler.settings.set_custom_message(
        ctx.guild.id,
        direction,
        CustomMessage {
            title,
            description,
            image,
        },
    ) {
        error!("Could not save welcomer settings, failed with error: {err:?}");
        return Err(ResponseError::Execution(
            "Could not save welcomer settings",
            Some("Please try again later.".to_string()),
        ));
    }

    ctx.reply(
        cmd,
        Response::new()
            .embed(
                CreateEmbed::new()
                    .title("Welcomer updated")
                    .description(format!("The {direction} message has been customised."))
                    .color(EMBED_COLOR),
            )
            .ephemeral(true),
    )
    .await
}
