use serenity::{
    all::{CommandInteraction, CommandOptionType, Permissions},
    builder::{CreateCommand, CreateCommandOption},
};

use crate::models::{
    command::{Command, CommandContext},
    handler::Handler,
    response::{ResponseError, ResponseResult},
};

pub mod end;
pub mod interaction;
pub mod new;
pub mod reroll;

pub const ACTIVE_COLOR: u32 = 0xfdca4c;
pub const ENDED_COLOR: u32 = 0x4752c4;

pub struct GiveawayCommand;

#[async_trait::async_trait]
impl Command for GiveawayCommand {
    fn name(&self) -> &'static str {
        "giveaway"
    }

    fn register(&self) -> CreateCommand {
        CreateCommand::new("giveaway")
            .description("Giveaway commands")
            .default_member_permissions(Permissions::MANAGE_GUILD)
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::SubCommand,
                    "new",
                    "Start a new giveaway",
                )
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::String,
                        "prize",
                        "The prize for the giveaway",
                    )
                    .required(true),
                )
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::Integer,
                        "duration",
                        "How long the giveaway runs, in minutes",
                    )
                    .required(true),
                )
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::Integer,
                        "winners",
                        "The number of winners for the giveaway (default: 1)",
                    )
                    .required(false),
                )
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::String,
                        "description",
                        "The description for the giveaway",
                    )
                    .required(false),
                ),
            )
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::SubCommand,
                    "reroll",
                    "Reroll an ended giveaway",
                )
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::String,
                        "id",
                        "The giveaway ID shown in the announcement footer",
                    )
                    .required(true),
                )
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::Integer,
                        "winners",
                        "The number of winners to draw (default: the original count)",
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
        let options = command.data.options();
        let Some(subcommand) = options.first() else {
            return Err(ResponseError::Execution(
                "Invalid giveaway command",
                Some("Please use one of the giveaway subcommands.".to_string()),
            ));
        };

        match subcommand.name {
            "new" => new::new(handler, ctx, command).await,
            "reroll" => reroll::reroll(handler, ctx, command).await,
            _ => Err(ResponseError::Execution(
                "Invalid giveaway command",
                Some("Please use one of the giveaway subcommands.".to_string()),
            )),
        }
    }
}
