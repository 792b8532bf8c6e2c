//! Teahouse CLI - drive the commerce stores and price utilities.
//!
//! # Usage
//!
//! ```bash
//! # Convert and format prices
//! teahouse price convert 1000 --from RUB --to USD
//! teahouse price format 1234.5 --currency RUB
//! teahouse price savings 1500 1200
//!
//! # Work with the persisted cart
//! teahouse cart add --id 1 --name "Da Hong Pao" --price 1000 --quantity 2
//! teahouse cart update --id 1 --quantity 0
//! teahouse cart show
//!
//! # Lists
//! teahouse wishlist toggle 5
//! teahouse compare add 7
//! teahouse viewed add 3
//!
//! # Region and preferences
//! teahouse region detect
//! teahouse prefs currency EUR
//!
//! # Talk to the form backend
//! teahouse submit newsletter --email tea@example.com
//! teahouse submit order --first-name Anna --last-name Petrova ...
//! ```
//!
//! State lives in `TEAHOUSE_DATA_DIR` (default `.teahouse`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use teahouse_client::{ClientConfig, Session};
use teahouse_core::{CurrencyCode, ProductId};

mod commands;

#[derive(Parser)]
#[command(name = "teahouse")]
#[command(author, version, about = "Teahouse commerce tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert, format and compare prices
    Price {
        #[command(subcommand)]
        action: PriceAction,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: ListAction,
    },
    /// Manage the comparison tray (up to 4 products)
    Compare {
        #[command(subcommand)]
        action: ListAction,
    },
    /// Manage recently viewed products
    Viewed {
        #[command(subcommand)]
        action: ListAction,
    },
    /// Show or change display preferences
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },
    /// Detect the shopper's region
    Region {
        #[command(subcommand)]
        action: RegionAction,
    },
    /// Submit forms to the backend
    Submit {
        #[command(subcommand)]
        form: SubmitForm,
    },
}

#[derive(Subcommand)]
enum PriceAction {
    /// Convert an amount between currencies
    Convert {
        amount: Decimal,
        #[arg(long, default_value = "RUB")]
        from: CurrencyCode,
        #[arg(long)]
        to: CurrencyCode,
    },
    /// Format a base-currency amount for display
    Format {
        amount: Decimal,
        /// Display currency (default: saved preference)
        #[arg(short, long)]
        currency: Option<CurrencyCode>,
        /// Append the ISO code
        #[arg(long)]
        code: bool,
        /// Omit the symbol
        #[arg(long)]
        no_symbol: bool,
    },
    /// Format a price range
    Range { min: Decimal, max: Decimal },
    /// Savings between an original and a discounted price
    Savings {
        original: Decimal,
        current: Decimal,
        #[arg(short, long)]
        currency: Option<CurrencyCode>,
    },
    /// List supported currencies
    Currencies,
}

#[derive(Args)]
struct LineArgs {
    /// Product id
    #[arg(long)]
    id: ProductId,
    /// Variant (e.g. package size)
    #[arg(long)]
    variant: Option<String>,
}

#[derive(Subcommand)]
enum CartAction {
    /// Add a product snapshot to the cart
    Add {
        #[command(flatten)]
        line: LineArgs,
        #[arg(long)]
        name: String,
        /// Unit price in the base currency
        #[arg(long)]
        price: Decimal,
        #[arg(long)]
        category: Option<String>,
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a line
    Remove {
        #[command(flatten)]
        line: LineArgs,
    },
    /// Set a line's quantity (0 or less removes it)
    Update {
        #[command(flatten)]
        line: LineArgs,
        #[arg(short, long, allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
    /// Show the cart and its totals
    Show,
}

#[derive(Subcommand)]
enum ListAction {
    /// Add a product id
    Add { id: ProductId },
    /// Remove a product id
    Remove { id: ProductId },
    /// Add if absent, remove if present (wishlist only)
    Toggle { id: ProductId },
    /// Remove everything
    Clear,
    /// Show the list
    Show,
}

#[derive(Subcommand)]
enum PrefsAction {
    /// Choose a display currency
    Currency { code: CurrencyCode },
    /// Choose a language (e.g. "ru")
    Language { language: String },
    /// Show current preferences
    Show,
}

#[derive(Subcommand)]
enum RegionAction {
    /// Run detection and seed preferences unless chosen explicitly
    Detect,
}

#[derive(Subcommand)]
enum SubmitForm {
    /// Subscribe to the newsletter
    Newsletter {
        #[arg(long)]
        email: String,
    },
    /// Send a contact message
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        message: String,
    },
    /// Record a login attempt
    Login {
        #[arg(long)]
        email: String,
    },
    /// Register an account
    Register {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
    },
    /// Place an order for the current cart
    Order(commands::submit::OrderArgs),
    /// Check backend health
    Health,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "teahouse_cli=info,teahouse_client=warn,teahouse_core=warn".into()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;

    let mut session = Session::open(&config)?;

    match cli.command {
        Commands::Price { action } => match action {
            PriceAction::Convert { amount, from, to } => commands::price::convert(amount, from, to),
            PriceAction::Format {
                amount,
                currency,
                code,
                no_symbol,
            } => commands::price::format(&session, amount, currency, code, no_symbol),
            PriceAction::Range { min, max } => commands::price::range(&session, min, max),
            PriceAction::Savings {
                original,
                current,
                currency,
            } => commands::price::savings(&session, original, current, currency),
            PriceAction::Currencies => commands::price::currencies(),
        },
        Commands::Cart { action } => match action {
            CartAction::Add {
                line,
                name,
                price,
                category,
                quantity,
            } => commands::cart::add(
                &mut session,
                commands::cart::NewLine {
                    id: line.id,
                    variant: line.variant,
                    name,
                    price,
                    category,
                    quantity,
                },
            )?,
            CartAction::Remove { line } => commands::cart::remove(&mut session, line.id, line.variant),
            CartAction::Update { line, quantity } => {
                commands::cart::update(&mut session, line.id, line.variant, quantity);
            }
            CartAction::Clear => commands::cart::clear(&mut session),
            CartAction::Show => commands::cart::show(&session),
        },
        Commands::Wishlist { action } => commands::lists::wishlist(&mut session, action.into()),
        Commands::Compare { action } => commands::lists::comparison(&mut session, action.into())?,
        Commands::Viewed { action } => commands::lists::viewed(&mut session, action.into())?,
        Commands::Prefs { action } => match action {
            PrefsAction::Currency { code } => commands::region::set_currency(&mut session, code),
            PrefsAction::Language { language } => {
                commands::region::set_language(&mut session, &language);
            }
            PrefsAction::Show => commands::region::show_preferences(&session),
        },
        Commands::Region {
            action: RegionAction::Detect,
        } => commands::region::detect(&mut session).await,
        Commands::Submit { form } => match form {
            SubmitForm::Newsletter { email } => commands::submit::newsletter(&session, email).await?,
            SubmitForm::Contact {
                name,
                email,
                subject,
                message,
            } => commands::submit::contact(&session, name, email, subject, message).await?,
            SubmitForm::Login { email } => commands::submit::login_attempt(&session, email).await?,
            SubmitForm::Register {
                first_name,
                last_name,
                email,
            } => commands::submit::register(&session, first_name, last_name, email).await?,
            SubmitForm::Order(args) => commands::submit::order(&mut session, args).await?,
            SubmitForm::Health => commands::submit::health(&session).await?,
        },
    }

    commands::report_notifications(&session);
    Ok(())
}

impl From<ListAction> for commands::lists::ListOp {
    fn from(action: ListAction) -> Self {
        match action {
            ListAction::Add { id } => Self::Add(id),
            ListAction::Remove { id } => Self::Remove(id),
            ListAction::Toggle { id } => Self::Toggle(id),
            ListAction::Clear => Self::Clear,
            ListAction::Show => Self::Show,
        }
    }
}
