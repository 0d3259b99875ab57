use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use card_hash::{CardInput, CardRecord, CardType};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use customers::{Customer, CustomerService, CustomerStore, NewCustomer, ServiceConfig};
use uuid::Uuid;

/// Exit status of `card check` when the customer does not own the card.
const EXIT_NOT_OWNED: u8 = 1;
const EXIT_ERROR: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "customers", about = "Manage customers and their hashed payment cards")]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, default_value = "customers.yaml")]
    conf: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(subcommand)]
    Customer(CustomerCommand),
    #[command(subcommand)]
    Card(CardCommand),
}

#[derive(Subcommand, Debug)]
enum CustomerCommand {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        address: String,
        /// YYYY-MM-DD
        #[arg(long)]
        date_of_birth: Option<NaiveDate>,
    },
    List,
    /// Print the customer followed by one line per card
    Show {
        id: Uuid,
    },
    Update {
        id: Uuid,
        #[arg(long)]
        name: String,
        #[arg(long)]
        address: String,
    },
    Delete {
        id: Uuid,
    },
}

#[derive(Subcommand, Debug)]
enum CardCommand {
    Add {
        customer_id: Uuid,
        #[command(flatten)]
        card: CardArgs,
    },
    List {
        customer_id: Uuid,
    },
    Edit {
        customer_id: Uuid,
        card_id: Uuid,
        #[command(flatten)]
        card: CardArgs,
    },
    Delete {
        customer_id: Uuid,
        card_id: Uuid,
    },
    /// Exit 0 if the customer owns the card, 1 if not
    Check {
        customer_id: Uuid,
        #[command(flatten)]
        card: CardArgs,
    },
}

#[derive(Args, Debug)]
struct CardArgs {
    /// Amex, Visa or MasterCard
    #[arg(long = "type")]
    card_type: CardType,
    #[arg(long)]
    number: String,
    /// MM/YYYY
    #[arg(long)]
    expiry: String,
    #[arg(long)]
    cvv: String,
}

impl CardArgs {
    fn to_input(&self) -> CardInput {
        CardInput::new(
            self.card_type,
            self.number.as_str(),
            self.expiry.as_str(),
            self.cvv.as_str(),
        )
    }
}

fn print_customer(customer: &Customer) {
    let dob = customer
        .date_of_birth
        .map(|d| d.to_string())
        .unwrap_or_else(|| "-".to_string());
    println!(
        "{}\t{}\t{}\t{}\t{}",
        customer.id,
        customer.name,
        customer.address,
        dob,
        customer.created_at.to_rfc3339()
    );
}

fn print_card(card: &CardRecord) {
    println!(
        "{}\t{}\t{}",
        card.id,
        card.card_type,
        card.created_at.to_rfc3339()
    );
}

fn open_service(conf: &Path) -> Result<CustomerService, Box<dyn Error>> {
    let config = ServiceConfig::load_or_default(conf)?;
    let base = conf
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let store = CustomerStore::new(config.database_path(base));
    store.init_schema()?;
    Ok(CustomerService::new(store))
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn Error>> {
    let service = open_service(&cli.conf)?;

    match cli.command {
        Command::Customer(command) => match command {
            CustomerCommand::Add {
                name,
                address,
                date_of_birth,
            } => {
                let mut new = NewCustomer::new(name, address);
                new.date_of_birth = date_of_birth;
                print_customer(&service.create_customer(new)?);
            }
            CustomerCommand::List => {
                for customer in service.list_customers()? {
                    print_customer(&customer);
                }
            }
            CustomerCommand::Show { id } => {
                print_customer(&service.get_customer(id)?);
                for card in service.list_cards(id)? {
                    print_card(&card);
                }
            }
            CustomerCommand::Update { id, name, address } => {
                print_customer(&service.update_customer(id, NewCustomer::new(name, address))?);
            }
            CustomerCommand::Delete { id } => service.delete_customer(id)?,
        },
        Command::Card(command) => match command {
            CardCommand::Add { customer_id, card } => {
                print_card(&service.add_card(customer_id, &card.to_input())?);
            }
            CardCommand::List { customer_id } => {
                for card in service.list_cards(customer_id)? {
                    print_card(&card);
                }
            }
            CardCommand::Edit {
                customer_id,
                card_id,
                card,
            } => {
                print_card(&service.edit_card(customer_id, card_id, &card.to_input())?);
            }
            CardCommand::Delete {
                customer_id,
                card_id,
            } => service.delete_card(customer_id, card_id)?,
            CardCommand::Check { customer_id, card } => {
                if service.check_card(customer_id, &card.to_input())? {
                    println!("owned");
                } else {
                    println!("not owned");
                    return Ok(ExitCode::from(EXIT_NOT_OWNED));
                }
            }
        },
    }

    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    // Enable basic logging; set RUST_LOG=info for visibility.
    env_logger::init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {e}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}
