mod logging;
mod render;
mod session_files;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use network_client::forms::{self, PostComposer, RegisterForm};
use network_client::{
    ClientConfig, FeedKind, FeedView, HttpClient, MutationStatus, PostItem, ProfileState,
    ProfileView, Route, SessionStore, SocialApi,
};
use session_files::{FileIdentityStore, SessionFiles};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Backend API base URL (overrides NETWORK_API_URL)
    #[arg(short, long)]
    server: Option<String>,

    /// Where the session identity and cookies are kept (default ~/.network)
    #[arg(long)]
    session_dir: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Register {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        /// Password confirmation; defaults to --password
        #[arg(long)]
        confirm: Option<String>,
    },

    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,
    },

    Logout,

    Status,

    /// All posts, newest first
    Feed {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },

    /// Posts from people you follow
    Following {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },

    Profile {
        #[arg(short, long)]
        id: i64,

        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },

    Users,

    Followers {
        #[arg(short, long)]
        id: i64,
    },

    Follows {
        #[arg(short, long)]
        id: i64,
    },

    Post {
        #[arg(short, long)]
        content: String,
    },

    Edit {
        #[arg(short, long)]
        id: i64,

        #[arg(short, long)]
        content: String,
    },

    Delete {
        #[arg(short, long)]
        id: i64,
    },

    /// Like the post, or unlike it if already liked
    Like {
        #[arg(short, long)]
        id: i64,
    },

    /// Follow the user, or unfollow if already following
    Follow {
        #[arg(short, long)]
        id: i64,
    },
}

fn fail(message: impl std::fmt::Display) -> ! {
    println!("❌ {}", message);
    std::process::exit(1);
}

fn login_hint() -> ! {
    println!("❌ Please login first:");
    println!("   network login --username <username> --password <password>");
    std::process::exit(1);
}

fn require_login(sessions: &SessionStore<FileIdentityStore>) {
    if !sessions.session().is_authenticated() {
        login_hint();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let mut config = ClientConfig::from_env();
    if let Some(server) = cli.server {
        config.base_url = server;
    }
    tracing::debug!("Using backend {}", config.base_url);

    let client = HttpClient::new(config).context("Failed to create network client")?;

    let files = SessionFiles::new(cli.session_dir)?;
    if let Some(cookies) = files.load_cookies()? {
        client.restore_session_cookies(&cookies)?;
    }

    let mut sessions = SessionStore::new(files.identity_store());
    sessions.restore();

    match cli.command {
        Commands::Register {
            username,
            email,
            password,
            confirm,
        } => {
            println!("📝 Registering user: {}", username);
            let form = RegisterForm {
                username,
                email,
                confirmation: confirm.unwrap_or_else(|| password.clone()),
                password,
            };

            match forms::register(&client, &form).await {
                Ok(_) => {
                    println!("✅ Registration successful!");
                    println!(
                        "   Log in with: network login --username {} --password <password>",
                        form.username
                    );
                }
                Err(message) => fail(message),
            }
        }

        Commands::Login { username, password } => {
            println!("🔑 Logging in as: {}", username);

            match sessions.login(&client, &username, &password).await {
                Some(_) => {
                    if let Some(cookies) = client.session_cookies() {
                        files.save_cookies(&cookies)?;
                    }
                    if let Some(identity) = sessions.identity() {
                        println!("✅ Login successful!");
                        println!("   User ID: {}", identity.id);
                        println!("   Username: {}", identity.username);
                        println!("   Email: {}", identity.email);
                    }
                }
                None => fail(sessions.error().unwrap_or(network_client::session::LOGIN_FAILED)),
            }
        }

        Commands::Logout => {
            sessions.logout(&client).await;
            files.clear_cookies()?;
            println!("👋 Logged out");
        }

        Commands::Status => match sessions.identity() {
            Some(identity) => {
                println!("🔑 Session dir: {:?}", files.dir());
                println!("   Logged in as: {} ({})", identity.username, identity.email);
                println!("   User ID: {}", identity.id);
            }
            None => {
                println!("❌ Not logged in");
                println!("   Please login first: network login --username <username> --password <password>");
            }
        },

        Commands::Feed { page } => show_feed(&client, &sessions, FeedKind::All, page).await,

        Commands::Following { page } => {
            show_feed(&client, &sessions, FeedKind::Following, page).await
        }

        Commands::Profile { id, page } => {
            let mut view = ProfileView::new(id);
            let request = view.start(sessions.session());
            let fetch = request.fetch(&client).await;
            view.apply(request, fetch);

            match view.state() {
                ProfileState::Ready(card) => render::profile(card),
                ProfileState::Failed(message) => fail(message),
                ProfileState::Idle | ProfileState::Loading => {}
            }

            view.posts
                .load_page(&client, sessions.session(), page)
                .await;
            if !render::feed(&view.posts, sessions.session()) {
                std::process::exit(1);
            }
        }

        Commands::Users => match client.list_users().await {
            Ok(users) => {
                println!("👥 {} users", users.len());
                users.iter().for_each(render::user_row);
            }
            Err(e) => fail(format!("Failed to list users: {}", e)),
        },

        Commands::Followers { id } => match client.list_followers(id).await {
            Ok(users) => {
                println!("👥 {} followers of user #{}", users.len(), id);
                users.iter().for_each(render::user_row);
            }
            Err(e) => fail(format!("Failed to list followers: {}", e)),
        },

        Commands::Follows { id } => match client.list_following(id).await {
            Ok(users) => {
                println!("👥 User #{} follows {} users", id, users.len());
                users.iter().for_each(render::user_row);
            }
            Err(e) => fail(format!("Failed to list following: {}", e)),
        },

        Commands::Post { content } => {
            require_login(&sessions);
            let mut composer = PostComposer::default();
            composer.content = content;
            if !composer.can_submit(sessions.session()) {
                fail("Post content cannot be empty");
            }
            if !composer.submit(&client, sessions.session()).await {
                fail("Failed to create post");
            }
            println!("✅ Post created successfully!");
            println!();
            show_feed(&client, &sessions, FeedKind::All, 1).await;
        }

        Commands::Edit { id, content } => {
            require_login(&sessions);
            if content.trim().is_empty() {
                fail("Post content cannot be empty");
            }
            let mut item = fetch_item(&client, id).await;
            if !item.begin_edit(sessions.session()) {
                fail("You can only edit your own posts");
            }
            item.set_edit_content(content);
            save_edit(&client, &sessions, item).await;
        }

        Commands::Delete { id } => {
            require_login(&sessions);
            let item = fetch_item(&client, id).await;
            if !item.is_own(sessions.session()) {
                fail("You can only delete your own posts");
            }
            match client.delete_post(id).await {
                Ok(()) => println!("✅ Post deleted successfully!"),
                Err(e) => fail(format!("Failed to delete post: {}", e)),
            }
        }

        Commands::Like { id } => {
            require_login(&sessions);
            let mut item = fetch_item(&client, id).await;
            let status = item.toggle_like(&client).await.cloned();
            match status {
                Some(MutationStatus::Committed) => {
                    let verb = if item.is_liked() { "Liked" } else { "Unliked" };
                    println!("✅ {} post #{}", verb, id);
                    render::post(&item, sessions.session());
                }
                Some(MutationStatus::Failed(reason)) => fail(reason),
                _ => fail("Could not update like"),
            }
        }

        Commands::Follow { id } => {
            require_login(&sessions);
            let mut view = ProfileView::new(id);
            let request = view.start(sessions.session());
            let fetch = request.fetch(&client).await;
            view.apply(request, fetch);

            match view.state() {
                ProfileState::Ready(card) if !card.can_follow => {
                    fail("You cannot follow yourself")
                }
                ProfileState::Ready(_) => {}
                ProfileState::Failed(message) => fail(message),
                ProfileState::Idle | ProfileState::Loading => fail("Profile not loaded"),
            }

            let follow = view.toggle_follow(&client).await.cloned();
            match follow {
                Some(follow) => match &follow.status {
                    MutationStatus::Failed(reason) => fail(reason),
                    _ => {
                        let verb = if follow.following { "Following" } else { "Unfollowed" };
                        println!("✅ {} user #{}", verb, id);
                        println!("   {} followers", follow.follower_count);
                    }
                },
                None => fail("Could not update follow status"),
            }
        }
    }

    Ok(())
}

async fn show_feed(
    client: &HttpClient,
    sessions: &SessionStore<FileIdentityStore>,
    kind: FeedKind,
    page: u32,
) {
    let mut feed = FeedView::new(kind);
    if let Some(Route::Login) = feed.load_page(client, sessions.session(), page).await {
        login_hint();
    }
    if !render::feed(&feed, sessions.session()) {
        std::process::exit(1);
    }
}

async fn fetch_item(client: &HttpClient, id: i64) -> PostItem {
    match client.get_post(id).await {
        Ok(post) => PostItem::from(post),
        Err(e) if e.is_not_found() => fail(format!("Post #{} not found", id)),
        Err(e) => fail(format!("Error: {}", e)),
    }
}

async fn save_edit(
    client: &HttpClient,
    sessions: &SessionStore<FileIdentityStore>,
    mut item: PostItem,
) {
    if item.save_edit(client).await {
        println!("✅ Post updated successfully!");
        render::post(&item, sessions.session());
    } else {
        let reason = item
            .edit()
            .and_then(|e| e.status.failure())
            .unwrap_or("Failed to update post")
            .to_string();
        fail(reason);
    }
}
