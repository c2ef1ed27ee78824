use crate::models::command::Command;

pub mod giveaway;
pub mod ticket;
pub mod welcomer;

pub fn get_command_list() -> Vec<Box<dyn Command>> {
    vec![
        Box::new(giveaway::GiveawayCommand),
        Box::new(ticket::TicketPanelCommand),
        Box::new(welcomer::WelcomerCommand),
    ]
}
