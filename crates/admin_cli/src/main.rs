use std::error::Error;

use clap::{Args, Parser, Subcommand};
use engine::{Balance, Engine, MoneyCents, NewEvent, Share, Transaction, Weight};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "dividi_admin")]
#[command(about = "Admin utilities for Dividi (groups, expenses and settlements)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./dividi.db?mode=rwc"
    )]
    database_url: String,

    /// Print results as JSON (amounts in cents) instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Group(Group),
    Person(Person),
    Event(Event),
    /// Show balances and transactions without storing anything.
    Preview(GroupArg),
    /// Compute and store the settlement, locking the group.
    Finalize(GroupArg),
    /// Drop the stored settlement and unlock the group.
    Reopen(GroupArg),
}

#[derive(Args, Debug)]
struct GroupArg {
    #[arg(long)]
    group: i64,
}

#[derive(Args, Debug)]
struct Group {
    #[command(subcommand)]
    command: GroupCommand,
}

#[derive(Subcommand, Debug)]
enum GroupCommand {
    Create(GroupCreateArgs),
    List,
    Show(GroupArg),
}

#[derive(Args, Debug)]
struct GroupCreateArgs {
    #[arg(long, default_value = "Unnamed Group")]
    name: String,
}

#[derive(Args, Debug)]
struct Person {
    #[command(subcommand)]
    command: PersonCommand,
}

#[derive(Subcommand, Debug)]
enum PersonCommand {
    Add(PersonAddArgs),
}

#[derive(Args, Debug)]
struct PersonAddArgs {
    #[arg(long)]
    group: i64,
    #[arg(long)]
    name: String,
}

#[derive(Args, Debug)]
struct Event {
    #[command(subcommand)]
    command: EventCommand,
}

#[derive(Subcommand, Debug)]
enum EventCommand {
    Add(EventAddArgs),
}

#[derive(Args, Debug)]
struct EventAddArgs {
    #[arg(long)]
    group: i64,
    #[arg(long)]
    title: Option<String>,
    /// Amount paid, e.g. `90` or `12.50`.
    #[arg(long)]
    amount: MoneyCents,
    /// Id of the person who paid.
    #[arg(long)]
    payer: i64,
    /// Participant as `PERSON_ID` or `PERSON_ID:WEIGHT`; repeat for each.
    #[arg(long = "participant", value_parser = parse_share)]
    participants: Vec<Share>,
}

fn parse_share(raw: &str) -> Result<Share, String> {
    let (id, weight) = match raw.split_once(':') {
        Some((id, weight)) => (id, weight.parse::<Weight>().map_err(|err| err.to_string())?),
        None => (raw, Weight::ONE),
    };
    let person_id = id
        .trim()
        .parse::<i64>()
        .map_err(|err| format!("invalid person id {id:?}: {err}"))?;
    Ok(Share::new(person_id, weight))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error + Send + Sync>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_balances(balances: &[Balance]) {
    for balance in balances {
        println!(
            "{:>4} {:<20} paid {:>10} owed {:>10} balance {:>10}",
            balance.person_id, balance.name, balance.paid, balance.owed, balance.net
        );
    }
}

fn print_transactions(transactions: &[Transaction]) {
    if transactions.is_empty() {
        println!("nothing to settle");
    }
    for tx in transactions {
        println!("{} -> {}: {}", tx.from_name, tx.to_name, tx.amount);
    }
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::Group(Group {
            command: GroupCommand::Create(args),
        }) => {
            let group_id = engine.create_group(&args.name).await?;
            println!("created group: {} ({group_id})", args.name);
        }
        Command::Group(Group {
            command: GroupCommand::List,
        }) => {
            let groups = engine.list_groups().await?;
            if cli.json {
                return print_json(&groups);
            }
            for group in groups {
                let state = if group.finalized { "finalized" } else { "open" };
                println!("{:>4} {} [{state}]", group.id, group.name);
            }
        }
        Command::Group(Group {
            command: GroupCommand::Show(args),
        }) => {
            let detail = engine.group(args.group).await?;
            if cli.json {
                return print_json(&detail);
            }
            let state = if detail.group.finalized { "finalized" } else { "open" };
            println!("{} [{state}]", detail.group.name);
            for person in detail.people {
                println!("{:>4} {}", person.id, person.name);
            }
        }
        Command::Person(Person {
            command: PersonCommand::Add(args),
        }) => {
            let person_id = engine.add_person(args.group, &args.name).await?;
            println!("added person: {} ({person_id})", args.name);
        }
        Command::Event(Event {
            command: EventCommand::Add(args),
        }) => {
            let event = engine
                .create_event(
                    args.group,
                    NewEvent {
                        title: args.title,
                        amount: args.amount,
                        payer_id: args.payer,
                        shares: args.participants,
                    },
                )
                .await?;
            if cli.json {
                return print_json(&event);
            }
            println!("recorded event: {} {} ({})", event.title, event.amount, event.id);
        }
        Command::Preview(args) => {
            let preview = engine.preview(args.group).await?;
            if cli.json {
                return print_json(&preview);
            }
            print_balances(&preview.balances);
            print_transactions(&preview.transactions);
        }
        Command::Finalize(args) => {
            let settlement = engine.finalize(args.group).await?;
            if cli.json {
                return print_json(&settlement);
            }
            println!("finalized at {} ({})", settlement.finalized_at, settlement.id);
            print_transactions(&settlement.transactions);
        }
        Command::Reopen(args) => {
            engine.reopen(args.group).await?;
            println!("reopened group {}", args.group);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_share_with_and_without_weight() {
        assert_eq!(parse_share("3").unwrap(), Share::equal(3));
        assert_eq!(
            parse_share("4:2.5").unwrap(),
            Share::new(4, Weight::from_micros(2_500_000).unwrap())
        );
        assert!(parse_share("x").is_err());
        assert!(parse_share("1:-1").is_err());
    }

    #[test]
    fn event_add_arguments() {
        let cli = Cli::try_parse_from([
            "dividi_admin",
            "--database-url",
            "sqlite::memory:",
            "event",
            "add",
            "--group",
            "1",
            "--amount",
            "90.00",
            "--payer",
            "1",
            "--participant",
            "1",
            "--participant",
            "2:3",
        ])
        .unwrap();
        let Command::Event(Event {
            command: EventCommand::Add(args),
        }) = cli.command
        else {
            panic!("expected event add");
        };
        assert_eq!(args.amount, MoneyCents::new(9000));
        assert_eq!(args.participants.len(), 2);
        assert_eq!(args.participants[1].weight, Weight::units(3));
    }
}
