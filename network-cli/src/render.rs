use colored::Colorize;
use network_client::{FeedState, FeedView, PaginationControl, PostItem, ProfileCard, Session, User};

pub fn post(item: &PostItem, session: &Session) {
    let post = item.post();
    let heart = if item.is_liked() { "♥".red() } else { "♡".normal() };
    let own = if item.is_own(session) { " (you)".dimmed().to_string() } else { String::new() };

    println!(
        "   [{}] {}{}  {}",
        post.id,
        format!("@{}", post.username).cyan().bold(),
        own,
        post.formatted_timestamp().dimmed()
    );
    for line in post.content.lines() {
        println!("      {}", line);
    }
    println!("      {} {}", heart, item.likes());
    println!();
}

pub fn pagination(control: Option<PaginationControl>) {
    let Some(control) = control else {
        return;
    };
    let previous = control
        .previous()
        .map(|p| format!("← --page {}   ", p))
        .unwrap_or_default();
    let next = control
        .next()
        .map(|p| format!("   --page {} →", p))
        .unwrap_or_default();
    println!("   {}{}{}", previous, control.label().bold(), next);
}

/// Prints a loaded feed. Returns `false` when the load failed.
pub fn feed(view: &FeedView, session: &Session) -> bool {
    println!("{}", view.kind().title().bold());
    println!();

    match view.state() {
        FeedState::Ready(page) if page.is_empty() => {
            println!("   {}", page.empty_message(view.kind()));
            true
        }
        FeedState::Ready(page) => {
            for item in &page.items {
                post(item, session);
            }
            pagination(page.pagination());
            true
        }
        FeedState::Failed { message, .. } => {
            println!("❌ {}", message);
            false
        }
        FeedState::Idle | FeedState::Loading { .. } => true,
    }
}

pub fn profile(card: &ProfileCard) {
    let user = &card.user;
    println!("{}", user.username.bold());
    if let Some(bio) = user.bio.as_deref().filter(|b| !b.is_empty()) {
        println!("   {}", bio);
    }
    println!("   Joined {}", user.date_joined.format("%b %d %Y").to_string().dimmed());
    println!(
        "   {} Followers   {} Following",
        card.follow.follower_count.to_string().bold(),
        user.following_count.to_string().bold()
    );
    if card.can_follow {
        let status = if card.follow.following {
            "✓ Following".green()
        } else {
            "Not following".normal()
        };
        println!("   {}", status);
    }
    println!();
}

pub fn user_row(user: &User) {
    println!(
        "   [{}] {}  {} followers, {} following",
        user.id,
        user.username.cyan(),
        user.follower_count,
        user.following_count
    );
}
