//! # Command Parsing
//!
//! Turns one input line into a [`Command`] with clap, so every command gets
//! `help` text and argument errors for free.
//!
//! ## Grammar
//! ```text
//! home                          featured products + categories
//! list [category]               catalog, optionally filtered
//! search <query...>             name / category / brand search
//! show <id>                     product detail
//! add <id> [qty]                add to cart (qty defaults to 1)
//! inc <id> | dec <id>           quantity stepper
//! qty <id> <n>                  set quantity (0 removes)
//! rm <id>                       remove line
//! clear                         empty the cart
//! cart                          cart with totals
//! wish <id> | wishlist          toggle / list wishlist
//! checkout | status | wait      start / poll / await the checkout
//! cancel | decline [reason...]  end a running checkout
//! login <email> <password>
//! register <name> <email> <password> <confirm> [--accept]
//! logout | whoami
//! config [save [path]]          show / write storefront.toml
//! reset | help [command] | quit
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use storefront_core::validation::RegistrationForm;
use storefront_core::ProductId;

/// One shell line.
#[derive(Debug, Parser)]
#[command(
    name = "storefront",
    about = "Storefront shell",
    no_binary_name = true,
    disable_version_flag = true,
    color = clap::ColorChoice::Never
)]
struct Line {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Featured products and category chips
    Home,

    /// Catalog grid, optionally one category
    #[command(alias = "ls")]
    List {
        #[arg(trailing_var_arg = true)]
        category: Vec<String>,
    },

    /// Search by name, category or brand
    Search {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        query: Vec<String>,
    },

    /// Product detail
    Show { id: ProductId },

    /// Add a product to the cart
    Add {
        id: ProductId,
        #[arg(default_value_t = 1, allow_negative_numbers = true)]
        quantity: i64,
    },

    /// One more of a cart line
    #[command(name = "inc", alias = "increment")]
    Increment { id: ProductId },

    /// One fewer of a cart line, never below 1
    #[command(name = "dec", alias = "decrement")]
    Decrement { id: ProductId },

    /// Set a line's quantity; 0 or less removes it
    #[command(name = "qty")]
    SetQuantity {
        id: ProductId,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Remove a cart line
    #[command(name = "rm", alias = "remove")]
    Remove { id: ProductId },

    /// Empty the cart
    Clear,

    /// Cart lines with totals
    Cart,

    /// Toggle the wishlist heart
    Wish { id: ProductId },

    /// Wishlisted products
    Wishlist,

    /// Start the checkout
    Checkout,

    /// Checkout progress
    Status,

    /// Wait for the checkout outcome
    Wait,

    /// Back out of the running checkout
    Cancel,

    /// End the running checkout as a declined payment
    Decline {
        #[arg(trailing_var_arg = true)]
        reason: Vec<String>,
    },

    /// Sign in (any non-empty email and password)
    Login { email: String, password: String },

    /// Create an account
    Register(RegisterArgs),

    /// Sign out
    Logout,

    /// Signed-in user, if any
    #[command(name = "whoami")]
    WhoAmI,

    /// Show or save the store configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },

    /// Empty cart and wishlist, sign out, stop the checkout
    Reset,

    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct RegisterArgs {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,

    /// Accept the terms and conditions
    #[arg(long)]
    pub accept: bool,
}

impl From<RegisterArgs> for RegistrationForm {
    fn from(args: RegisterArgs) -> Self {
        RegistrationForm {
            name: args.name,
            email: args.email,
            password: args.password,
            confirm_password: args.confirm_password,
            accepted_terms: args.accept,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum ConfigAction {
    /// Write the active configuration as TOML
    Save {
        /// Defaults to the platform config directory
        path: Option<PathBuf>,
    },
}

impl Command {
    /// Parses a line. Blank lines give `Ok(None)`.
    ///
    /// The command word is matched case-insensitively; arguments are kept
    /// as typed. `help` and `--help` come back as a clap error of kind
    /// `DisplayHelp` carrying the rendered text.
    pub fn parse(line: &str) -> Result<Option<Command>, clap::Error> {
        let mut words = line.split_whitespace();
        let Some(first) = words.next() else {
            return Ok(None);
        };

        let words = std::iter::once(first.to_ascii_lowercase()).chain(words.map(str::to_string));
        let line = Line::try_parse_from(words)?;
        Ok(Some(line.command))
    }
}

/// Joins free-text words back into one string, `None` when there were none.
pub fn join_words(words: &[String]) -> Option<String> {
    (!words.is_empty()).then(|| words.join(" "))
}
