use colored::Colorize;
use profile_card_lib::ProfileCard;
use sysexits::ExitCode;

pub fn show(card: &ProfileCard) -> ExitCode {
    let profile = card.profile();
    let engagement = card.engagement();

    let avatar = match profile.avatar() {
        Some(avatar) => avatar.to_string(),
        None => format!("[{}]", profile.initials()),
    };

    println!("{} {}", profile.name().bold(), avatar.dimmed());
    println!("{} at {}", profile.title(), profile.company());
    println!("{} · joined {}", profile.location(), profile.join_date());
    println!();
    println!("{}", profile.bio());
    println!();
    println!(
        "{} followers  {} following  {} likes",
        profile.follower_count(),
        profile.following_count(),
        engagement.likes()
    );
    println!(
        "{}  {}",
        if engagement.is_following() {
            "Following".green()
        } else {
            "Not following".normal()
        },
        if engagement.is_liked() {
            "♥ Liked".red()
        } else {
            "♡".normal()
        }
    );

    ExitCode::Ok
}

pub fn follow(card: &mut ProfileCard) -> ExitCode {
    card.toggle_follow();

    if card.engagement().is_following() {
        println!("Following {}", card.profile().name());
    } else {
        println!("Unfollowed {}", card.profile().name());
    }

    ExitCode::Ok
}

pub fn like(card: &mut ProfileCard) -> ExitCode {
    card.toggle_like();

    let engagement = card.engagement();
    let verb = if engagement.is_liked() { "Liked" } else { "Unliked" };
    println!("{verb} ({} likes)", engagement.likes());

    ExitCode::Ok
}
