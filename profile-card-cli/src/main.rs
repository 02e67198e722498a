use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use profile_card_lib::{ContactAction, ProfileCard, StorageAdapter, logging};
use sysexits::ExitCode;

mod avatar;
mod card;
mod edit;

#[derive(Parser, Debug)]
#[command(name = "profile-card")]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Override the storage namespace
    #[arg(short, long, global = true)]
    namespace: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Print the card
    Show,
    /// Follow or unfollow
    Follow,
    /// Like or unlike
    Like,
    /// Change editable fields, e.g. `edit name=Ada "title=Analyst"`
    Edit(edit::Args),
    /// Change the avatar
    #[command(subcommand)]
    Avatar(avatar::Command),
    /// Print the URI for contacting the profile's owner
    Contact {
        #[arg(value_enum)]
        action: Contact,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Contact {
    Email,
    Call,
}

impl From<Contact> for ContactAction {
    fn from(contact: Contact) -> Self {
        match contact {
            Contact::Email => ContactAction::Email,
            Contact::Call => ContactAction::Call,
        }
    }
}

fn main() -> ExitCode {
    human_panic::setup_panic!();
    logging::init();

    let cli = Cli::parse();

    let mut card = match open(cli.namespace) {
        Ok(card) => card,
        Err(err) => {
            eprintln!("{} {err}", "Failed to open the profile store:".red());
            return ExitCode::IoErr;
        }
    };

    let code = match &cli.command {
        Command::Show => card::show(&card),
        Command::Follow => card::follow(&mut card),
        Command::Like => card::like(&mut card),
        Command::Edit(args) => edit::handle(&mut card, args),
        Command::Avatar(cmd) => avatar::handle(&mut card, cmd),
        Command::Contact { action } => {
            println!("{}", card.contact((*action).into()));
            ExitCode::Ok
        }
    };

    for err in card.take_sync_errors() {
        eprintln!("{} {err}", "warning: not saved:".yellow());
    }

    code
}

fn open(namespace: Option<String>) -> profile_card_lib::storage::Result<ProfileCard> {
    let mut cfg = profile_card_lib::CoreConfig::load();
    if let Some(namespace) = namespace {
        cfg.namespace = namespace;
    }

    let storage = StorageAdapter::open(&cfg)?;
    Ok(ProfileCard::new(storage, cfg))
}
