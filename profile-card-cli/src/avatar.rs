use std::{fs, path::PathBuf};

use clap::Subcommand;
use colored::Colorize;
use profile_card_lib::{CardError, ProfileCard, avatar::GALLERY};
use sysexits::ExitCode;

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List the predefined avatars
    Gallery,
    /// Use a predefined avatar
    Pick { index: usize },
    /// Use an image at a URL
    Url { locator: String },
    /// Embed a local image file
    Upload { path: PathBuf },
    /// Remove the avatar
    Clear,
}

pub fn handle(card: &mut ProfileCard, cmd: &Command) -> ExitCode {
    if let Command::Gallery = cmd {
        for (i, locator) in GALLERY.iter().enumerate() {
            println!("{i}: {locator}");
        }
        return ExitCode::Ok;
    }

    if let Err(err) = card.open_avatar_picker() {
        eprintln!("{} {err}", "error:".red());
        return ExitCode::Software;
    }

    let result = match cmd {
        Command::Gallery => Ok(()),
        Command::Pick { index } => card.select_gallery_avatar(*index),
        Command::Url { locator } => card.set_avatar_from_reference(locator.as_str()),
        Command::Upload { path } => match fs::read(path) {
            Ok(bytes) => card.set_avatar_from_local_file(&bytes),
            Err(err) => {
                card.close_avatar_picker();
                eprintln!("{} {}: {err}", "error:".red(), path.display());
                return ExitCode::NoInput;
            }
        },
        Command::Clear => {
            card.clear_avatar();
            Ok(())
        }
    };

    match result {
        Ok(()) => {
            match card.profile().avatar() {
                Some(avatar) => println!("Avatar set to {avatar}"),
                None => println!("Avatar removed"),
            }
            ExitCode::Ok
        }
        Err(err) => {
            card.close_avatar_picker();
            eprintln!("{} {err}", "error:".red());
            match err {
                CardError::Avatar(_) => ExitCode::DataErr,
                _ => ExitCode::Usage,
            }
        }
    }
}
