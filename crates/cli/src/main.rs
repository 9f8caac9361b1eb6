//! Threadline CLI - browse the shop, manage a cart and run the back office.
//!
//! # Usage
//!
//! ```bash
//! # Browse
//! tl-cli products list --category women --search lawn
//! tl-cli products show 66a1f0
//!
//! # Cart (kept in THREADLINE_CART_PATH between runs)
//! tl-cli cart add 66a1f0 --size M --color Navy
//! tl-cli cart show
//! tl-cli checkout --first-name Ayesha --last-name Khan --email ayesha@example.pk \
//!     --phone "+92 300 1234567" --address "12 Mall Road" --city Lahore \
//!     --province Punjab --postal-code 54000
//!
//! # Back office (THREADLINE_ADMIN_EMAIL / THREADLINE_ADMIN_PASSWORD)
//! tl-cli admin orders list --status processing --sort total
//! tl-cli admin qa answer 65f0aa --text "Yes, it is pre-shrunk."
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use sentry::integrations::tracing as sentry_tracing;
use threadline_core::{Category, OrderSortKey, OrderStatus};
use threadline_storefront::StorefrontConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;
mod output;

#[derive(Parser)]
#[command(name = "tl-cli")]
#[command(author, version, about = "Threadline shop and back office")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Manage the local cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place an order for everything in the cart (cash on delivery)
    Checkout(CheckoutArgs),
    /// Product questions
    Qa {
        #[command(subcommand)]
        action: QaAction,
    },
    /// Back-office tasks (requires admin credentials)
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List products
    List {
        /// Only products whose name contains this text
        #[arg(short, long, default_value = "")]
        search: String,
        /// Only products in this department (men, women, kids)
        #[arg(short, long)]
        category: Option<Category>,
        /// Only products featured on the landing page
        #[arg(long)]
        featured: bool,
    },
    /// Show one product
    Show { id: String },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart with totals
    Show,
    /// Add a product
    Add {
        product_id: String,
        #[arg(short, long)]
        size: Option<String>,
        #[arg(short, long)]
        color: Option<String>,
    },
    /// Remove a product
    Remove { product_id: String },
    /// Empty the cart
    Clear,
}

#[derive(clap::Args)]
struct CheckoutArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    address: String,
    #[arg(long)]
    city: String,
    #[arg(long)]
    province: String,
    #[arg(long)]
    postal_code: String,
}

#[derive(Subcommand)]
enum QaAction {
    /// Questions asked about a product
    List { product_id: String },
    /// Ask a question about a product
    Ask {
        product_id: String,
        #[arg(long)]
        text: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Add, edit and remove products
    Products {
        #[command(subcommand)]
        action: AdminProductsAction,
    },
    /// Landing page banners
    Banners {
        #[command(subcommand)]
        action: BannersAction,
    },
    /// Moderate questions
    Qa {
        #[command(subcommand)]
        action: AdminQaAction,
    },
    /// View and update orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
}

#[derive(clap::Args)]
struct ProductFields {
    #[arg(long)]
    name: String,
    #[arg(long)]
    description: String,
    #[arg(long)]
    price: String,
    /// Men, Women or Kids
    #[arg(long)]
    category: String,
    /// Repeat for each size (S, M, L, XL, XXL)
    #[arg(long = "size", required = true)]
    sizes: Vec<String>,
    #[arg(long)]
    color: String,
    #[arg(long)]
    featured: bool,
    /// Image files to upload (.jpeg, .jpg, .png, .gif)
    #[arg(long = "image")]
    images: Vec<PathBuf>,
}

#[derive(Subcommand)]
enum AdminProductsAction {
    /// Create a product
    Add(ProductFields),
    /// Replace a product's fields; new images are appended to the existing ones
    Update {
        id: String,
        #[command(flatten)]
        fields: ProductFields,
    },
    /// Delete a product
    Delete { id: String },
    /// Feature a product on the landing page
    Feature {
        id: String,
        /// Remove the featured flag instead
        #[arg(long)]
        off: bool,
    },
}

#[derive(Subcommand)]
enum BannersAction {
    List,
    Upload { path: PathBuf },
    Delete { id: String },
}

#[derive(Subcommand)]
enum AdminQaAction {
    /// Every question across the catalog
    List {
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// Post an official answer
    Answer {
        question_id: String,
        #[arg(long)]
        text: String,
        /// Signature shown on the answer (default: Store Admin)
        #[arg(long = "as")]
        answered_by: Option<String>,
    },
    DeleteQuestion { question_id: String },
    DeleteAnswer { question_id: String, answer_id: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Date,
    Total,
}

impl From<SortArg> for OrderSortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Date => Self::Date,
            SortArg::Total => Self::Total,
        }
    }
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List orders, newest first by default
    List {
        /// Match customer name or order id
        #[arg(short, long, default_value = "")]
        search: String,
        #[arg(long)]
        status: Option<OrderStatus>,
        #[arg(long, value_enum, default_value = "date")]
        sort: SortArg,
        /// Ascending instead of descending
        #[arg(long)]
        asc: bool,
    },
    /// Change an order's status
    Status { id: String, status: OrderStatus },
}

/// Initialize Sentry error tracking if `SENTRY_DSN` is set.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt::init();
            tracing::error!("Configuration error: {e}");
            std::process::exit(2);
        }
    };

    // Sentry must be initialized before the subscriber.
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "threadline_cli=info,threadline_storefront=info,threadline_admin=info".into()
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(cli, &config).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &StorefrontConfig) -> Result<(), commands::CliError> {
    let shop = commands::Shop::new(config)?;

    match cli.command {
        Commands::Products { action } => match action {
            ProductsAction::List {
                search,
                category,
                featured,
            } => shop.list_products(&search, category, featured).await?,
            ProductsAction::Show { id } => shop.show_product(&id).await?,
        },
        Commands::Cart { action } => match action {
            CartAction::Show => shop.show_cart()?,
            CartAction::Add {
                product_id,
                size,
                color,
            } => {
                shop.add_to_cart(&product_id, size.as_deref(), color.as_deref())
                    .await?;
            }
            CartAction::Remove { product_id } => shop.remove_from_cart(&product_id)?,
            CartAction::Clear => shop.clear_cart()?,
        },
        Commands::Checkout(args) => shop.checkout(&args.into()).await?,
        Commands::Qa { action } => match action {
            QaAction::List { product_id } => shop.list_questions(&product_id).await?,
            QaAction::Ask {
                product_id,
                text,
                name,
                email,
            } => shop.ask_question(&product_id, &text, &name, &email).await?,
        },
        Commands::Admin { action } => {
            let back_office = commands::BackOffice::login(&shop).await?;
            run_admin(&back_office, action).await?;
        }
    }
    Ok(())
}

async fn run_admin(
    back_office: &commands::BackOffice,
    action: AdminAction,
) -> Result<(), commands::CliError> {
    match action {
        AdminAction::Products { action } => match action {
            AdminProductsAction::Add(fields) => {
                let (form, images) = fields.into_parts();
                back_office.add_product(&form, &images).await?;
            }
            AdminProductsAction::Update { id, fields } => {
                let (form, images) = fields.into_parts();
                back_office.update_product(&id, &form, &images).await?;
            }
            AdminProductsAction::Delete { id } => back_office.delete_product(&id).await?,
            AdminProductsAction::Feature { id, off } => back_office.feature(&id, !off).await?,
        },
        AdminAction::Banners { action } => match action {
            BannersAction::List => back_office.list_banners().await?,
            BannersAction::Upload { path } => back_office.upload_banner(&path).await?,
            BannersAction::Delete { id } => back_office.delete_banner(&id).await?,
        },
        AdminAction::Qa { action } => match action {
            AdminQaAction::List { search } => back_office.list_questions(&search).await?,
            AdminQaAction::Answer {
                question_id,
                text,
                answered_by,
            } => {
                back_office
                    .answer(&question_id, &text, answered_by.as_deref())
                    .await?;
            }
            AdminQaAction::DeleteQuestion { question_id } => {
                back_office.delete_question(&question_id).await?;
            }
            AdminQaAction::DeleteAnswer {
                question_id,
                answer_id,
            } => back_office.delete_answer(&question_id, &answer_id).await?,
        },
        AdminAction::Orders { action } => match action {
            OrdersAction::List {
                search,
                status,
                sort,
                asc,
            } => {
                let query = threadline_core::OrderQuery {
                    search,
                    status,
                    sort_by: sort.into(),
                    direction: if asc {
                        threadline_core::SortDirection::Asc
                    } else {
                        threadline_core::SortDirection::Desc
                    },
                };
                back_office.list_orders(&query).await?;
            }
            OrdersAction::Status { id, status } => back_office.set_status(&id, status).await?,
        },
    }
    Ok(())
}

impl From<CheckoutArgs> for threadline_core::CheckoutForm {
    fn from(args: CheckoutArgs) -> Self {
        Self {
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            phone_number: args.phone,
            address: args.address,
            city: args.city,
            province: args.province,
            postal_code: args.postal_code,
            payment_method: threadline_core::PaymentMethod::CashOnDelivery,
        }
    }
}

impl ProductFields {
    fn into_parts(self) -> (threadline_admin::ProductForm, Vec<PathBuf>) {
        (
            threadline_admin::ProductForm {
                name: self.name,
                description: self.description,
                price: self.price,
                category: self.category,
                sizes: self.sizes,
                color: self.color,
                is_featured: self.featured,
            },
            self.images,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_order_listing() {
        let cli = Cli::try_parse_from([
            "tl-cli", "admin", "orders", "list", "--status", "shipped", "--sort", "total", "--asc",
        ])
        .unwrap_or_else(|e| panic!("{e}"));
        let Commands::Admin {
            action: AdminAction::Orders {
                action: OrdersAction::List { status, asc, .. },
            },
        } = cli.command
        else {
            panic!("wrong subcommand");
        };
        assert_eq!(status, Some(OrderStatus::Shipped));
        assert!(asc);
    }

    #[test]
    fn test_product_sizes_required() {
        let result = Cli::try_parse_from([
            "tl-cli", "admin", "products", "add", "--name", "Tee", "--description",
            "A plain cotton tee", "--price", "999", "--category", "Men", "--color", "White",
        ]);
        assert!(result.is_err());
    }
}
