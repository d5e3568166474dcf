//! # Storefront Shell Library
//!
//! Drives a [`Session`] from text commands, standing in for the mobile UI.
//!
//! ## Startup
//! 1. Initialize tracing (logging)
//! 2. Load `StoreConfig` (file, env, defaults)
//! 3. Build a session over the seed catalog
//! 4. Read commands from stdin, print one JSON line per command

pub mod commands;
pub mod error;
pub mod parse;

use clap::error::ErrorKind;
use serde::Serialize;
use storefront_core::validation::RegistrationForm;
use storefront_session::{CheckoutHandle, Session, StoreConfig};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::commands::{
    auth, cart, catalog, checkout, config, wishlist, AuthResponse, CartResponse, CheckoutResultDto,
    CheckoutStatusDto, HomeDto, ProductDetailDto, ProductDto, WishlistResponse,
};
use crate::error::ApiError;
use crate::parse::{join_words, Command, ConfigAction};

/// What a successful command prints.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Response {
    Home(HomeDto),
    Products(Vec<ProductDto>),
    Product(Box<ProductDetailDto>),
    Cart(CartResponse),
    Wishlist(WishlistResponse),
    CheckoutStatus(CheckoutStatusDto),
    CheckoutResult(CheckoutResultDto),
    Auth(AuthResponse),
    Config(Box<StoreConfig>),
    Text { message: String },
}

impl Response {
    fn text(message: impl Into<String>) -> Self {
        Response::Text {
            message: message.into(),
        }
    }
}

/// One handled line: what to print, and whether the shell should stop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineOutcome {
    /// `None` for blank lines.
    pub output: Option<String>,
    pub quit: bool,
}

/// A session plus the checkout the shopper is currently watching.
pub struct Shell {
    session: Session,
    pending_checkout: Option<CheckoutHandle>,
}

impl Shell {
    pub fn new(session: Session) -> Self {
        Shell {
            session,
            pending_checkout: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Runs one command.
    pub async fn execute(&mut self, command: Command) -> Result<Response, ApiError> {
        let session = &self.session;
        let pending = &mut self.pending_checkout;

        let response = match command {
            Command::Home => Response::Home(catalog::home(session)),
            Command::List { category } => Response::Products(catalog::list_products(
                session,
                join_words(&category).as_deref(),
            )),
            Command::Search { query } => Response::Products(catalog::search_products(
                session,
                &join_words(&query).unwrap_or_default(),
            )?),
            Command::Show { id } => Response::Product(Box::new(catalog::get_product(session, id)?)),

            Command::Add { id, quantity } => Response::Cart(cart::add_to_cart(session, id, quantity)?),
            Command::Increment { id } => Response::Cart(cart::increment(session, id)?),
            Command::Decrement { id } => Response::Cart(cart::decrement(session, id)),
            Command::SetQuantity { id, quantity } => {
                Response::Cart(cart::update_quantity(session, id, quantity)?)
            }
            Command::Remove { id } => Response::Cart(cart::remove_from_cart(session, id)),
            Command::Clear => Response::Cart(cart::clear_cart(session)),
            Command::Cart => Response::Cart(cart::get_cart(session)),

            Command::Wish { id } => Response::Wishlist(wishlist::toggle_wishlist(session, id)?),
            Command::Wishlist => Response::Wishlist(wishlist::get_wishlist(session)),

            Command::Checkout => {
                Response::CheckoutStatus(checkout::start_checkout(session, pending)?)
            }
            Command::Status => Response::CheckoutStatus(checkout::checkout_status(session)),
            Command::Wait => {
                Response::CheckoutResult(checkout::wait_checkout(session, pending).await?)
            }
            Command::Cancel => {
                Response::CheckoutResult(checkout::cancel_checkout(session, pending).await?)
            }
            Command::Decline { reason } => {
                let reason = join_words(&reason).unwrap_or_else(|| DEFAULT_DECLINE_REASON.into());
                Response::CheckoutResult(
                    checkout::decline_checkout(session, pending, &reason).await?,
                )
            }

            Command::Login { email, password } => {
                Response::Auth(auth::login(session, &email, &password).await?)
            }
            Command::Register(args) => {
                Response::Auth(auth::register(session, &RegistrationForm::from(args)).await?)
            }
            Command::Logout => Response::Auth(auth::logout(session)),
            Command::WhoAmI => Response::Auth(auth::whoami(session)),

            Command::Config { action: None } => {
                Response::Config(Box::new(config::get_config(session)))
            }
            Command::Config {
                action: Some(ConfigAction::Save { path }),
            } => Response::text(config::save_config(session, path)?),

            Command::Reset => {
                *pending = None;
                session.reset();
                Response::text("Session reset")
            }
            Command::Quit => Response::text("Bye"),
        };

        Ok(response)
    }

    /// Parses and runs one line, rendering the result as a JSON string.
    pub async fn handle_line(&mut self, line: &str) -> LineOutcome {
        let mut quit = false;
        let result = match Command::parse(line) {
            Ok(Some(command)) => {
                quit = matches!(command, Command::Quit);
                self.execute(command).await
            }
            Ok(None) => return LineOutcome::default(),
            Err(e) if e.kind() == ErrorKind::DisplayHelp => Ok(Response::text(e.to_string())),
            Err(e) => Err(ApiError::from(e)),
        };

        let rendered = match result {
            Ok(response) => serde_json::to_string(&response),
            Err(err) => serde_json::to_string(&serde_json::json!({ "error": err })),
        };
        let output = rendered.unwrap_or_else(|e| {
            tracing::error!("Failed to render response: {}", e);
            r#"{"error":{"code":"INTERNAL","message":"Failed to render response"}}"#.to_string()
        });

        LineOutcome {
            output: Some(output),
            quit,
        }
    }
}

/// Reason shown when `decline` is given none.
const DEFAULT_DECLINE_REASON: &str = "Card declined";

/// Initializes the tracing subscriber.
///
/// Logs go to stderr so stdout stays one JSON response per line.
/// `RUST_LOG` overrides the default `info` filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Runs the interactive shell until `quit` or end of input.
pub async fn run() -> Result<(), ApiError> {
    let config = StoreConfig::load_or_default(None);
    let session = Session::with_seed_catalog(config)?;
    info!(session_id = %session.id(), "Storefront shell ready");

    let mut shell = Shell::new(session);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?
    {
        let outcome = shell.handle_line(&line).await;
        if let Some(output) = outcome.output {
            println!("{}", output);
        }
        if outcome.quit {
            break;
        }
    }

    info!("Storefront shell exiting");
    Ok(())
}
