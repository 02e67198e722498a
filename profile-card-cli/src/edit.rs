use colored::Colorize;
use profile_card_lib::{CardError, EditableField, ProfileCard};
use sysexits::ExitCode;

#[derive(clap::Args, Debug, Clone)]
pub struct Args {
    /// `field=value` pairs; fields are name, title, company, location and bio
    #[arg(value_parser = parse_assignment, required = true)]
    assignments: Vec<(EditableField, String)>,
}

fn parse_assignment(arg: &str) -> Result<(EditableField, String), CardError> {
    let (field, value) = arg
        .split_once('=')
        .ok_or_else(|| CardError::UnknownField(arg.to_string()))?;

    Ok((field.parse()?, value.to_string()))
}

pub fn handle(card: &mut ProfileCard, args: &Args) -> ExitCode {
    if let Err(err) = edit(card, args) {
        card.cancel_edit();
        eprintln!("{} {err}", "error:".red());
        return ExitCode::Software;
    }

    for (field, _) in &args.assignments {
        println!("{field}: {}", card.profile().field(*field));
    }

    ExitCode::Ok
}

fn edit(card: &mut ProfileCard, args: &Args) -> Result<(), CardError> {
    card.begin_edit()?;

    for (field, value) in &args.assignments {
        card.update_draft_field(*field, value.as_str())?;
    }

    card.commit_edit()
}
