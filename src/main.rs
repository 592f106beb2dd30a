use chrono::{Datelike, Local, NaiveDate};
use clap::Parser;
use env_logger::Env;
use pilaris::application::{
    daily_report, init::init, open_ledger, yearly_report, ConfigService, DayStore,
};
use pilaris::cli::{
    format_currency, format_daily_report, format_expense_list, format_reminders,
    format_schedule, format_service_list, format_tag_list, format_yearly_summary, Cli, Commands,
    ExpenseCommand, LedgerCommand, ServiceCommand, StudentCommand, TagCommand, TemplateCommand,
};
use pilaris::domain::{AttendanceStatus, DateReference, StudentPatch, TimeSlotPatch};
use pilaris::error::{PilarisError, Result};
use pilaris::infrastructure::FileSystemStorage;
use std::str::FromStr;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(_) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {}", e.display_with_suggestions());
            std::process::exit(e.exit_code());
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let date = DateReference::parse(&cli.date)?.resolve(Local::now().date_naive())?;

    match cli.command {
        Commands::Init { path, namespace } => init(&path, &namespace),
        Commands::Config { key, value, list } => {
            let service = ConfigService::new(FileSystemStorage::discover()?);

            if list {
                let config = service.list()?;
                println!("namespace = {}", config.namespace);
                println!("currency = {}", config.currency);
            } else if let Some(k) = key {
                if let Some(v) = value {
                    service.set(&k, &v)?;
                    println!("Set {} = {}", k, v);
                } else {
                    println!("{}", service.get(&k)?);
                }
            } else {
                println!("Usage: pilaris config [--list | <key> [<value>]]");
                println!("Valid keys: namespace, currency");
            }
            Ok(())
        }
        Commands::Ledger(command) => {
            let (mut store, config) = open_ledger(FileSystemStorage::discover()?, date)?;
            run_ledger_command(&mut store, &config.currency, command)
        }
    }
}

fn run_ledger_command(
    store: &mut DayStore<FileSystemStorage>,
    currency: &str,
    command: LedgerCommand,
) -> Result<()> {
    let date = store.current_date();

    match command {
        LedgerCommand::Show => {
            print!("{}", format_schedule(date, store.schedule(), store.settings()));
        }
        LedgerCommand::Student(cmd) => run_student_command(store, cmd)?,
        LedgerCommand::Slot { time, service } => {
            let service_id = if service.eq_ignore_ascii_case("none") {
                None
            } else if store.settings().service(&service).is_some() {
                Some(service)
            } else {
                return Err(PilarisError::NotFound(format!("service '{}'", service)));
            };

            let patch = TimeSlotPatch {
                service_id: Some(service_id),
            };
            if !store.update_time_slot(&time, &patch) {
                return Err(slot_not_found(&time, date));
            }
            println!("Updated slot {}", time);
        }
        LedgerCommand::Expense(cmd) => match cmd {
            ExpenseCommand::Add {
                description,
                amount,
            } => {
                let id = store.add_expense(&description, amount)?;
                println!(
                    "Added expense {} ({})",
                    id,
                    format_currency(amount, currency)
                );
            }
            ExpenseCommand::Remove { id } => {
                if !store.remove_expense(&id) {
                    return Err(PilarisError::NotFound(format!("expense '{}'", id)));
                }
                println!("Removed expense {}", id);
            }
            ExpenseCommand::List => println!("{}", format_expense_list(store.expenses(), currency)),
        },
        LedgerCommand::Service(cmd) => run_service_command(store, currency, cmd)?,
        LedgerCommand::Tag(cmd) => {
            let mut settings = store.settings().clone();
            match cmd {
                TagCommand::Add { tag } => {
                    if !settings.add_tag(&tag) {
                        return Err(PilarisError::Config(format!(
                            "Tag '{}' is blank or already exists",
                            tag.trim()
                        )));
                    }
                    store.update_settings(settings);
                    println!("Added tag {}", tag.trim());
                }
                TagCommand::Remove { tag } => {
                    if !settings.remove_tag(&tag) {
                        return Err(PilarisError::NotFound(format!("tag '{}'", tag)));
                    }
                    store.update_settings(settings);
                    println!("Removed tag {}", tag);
                }
                TagCommand::List => println!("{}", format_tag_list(&settings.student_tags)),
            }
        }
        LedgerCommand::Notify {
            enable,
            disable,
            minutes,
        } => {
            let mut settings = store.settings().clone();
            if enable {
                settings.notifications_enabled = true;
            }
            if disable {
                settings.notifications_enabled = false;
            }
            if let Some(minutes) = minutes {
                settings.notification_minutes = minutes;
            }
            if enable || disable || minutes.is_some() {
                store.update_settings(settings);
            }

            let settings = store.settings();
            println!(
                "Reminders {} ({} minutes before)",
                if settings.notifications_enabled {
                    "enabled"
                } else {
                    "disabled"
                },
                settings.notification_minutes
            );
        }
        LedgerCommand::Template(TemplateCommand::Save) => {
            store.save_schedule_as_template();
            println!("Saved schedule of {} as template", date);
        }
        LedgerCommand::Report => print!("{}", format_daily_report(&daily_report(store), currency)),
        LedgerCommand::Accounting { year } => {
            let year = year.unwrap_or_else(|| date.year());
            print!(
                "{}",
                format_yearly_summary(year, &yearly_report(store, year), currency)
            );
        }
        LedgerCommand::Remind => {
            let due = store.take_due_reminders(Local::now().naive_local());
            println!("{}", format_reminders(&due).trim_end());
        }
    }

    Ok(())
}

fn slot_not_found(time: &str, date: NaiveDate) -> PilarisError {
    PilarisError::NotFound(format!("slot {} on {}", time, date))
}

fn run_student_command(store: &mut DayStore<FileSystemStorage>, cmd: StudentCommand) -> Result<()> {
    let date = store.current_date();

    match cmd {
        StudentCommand::Add { time } => {
            let id = store
                .add_student_slot(&time)
                .ok_or_else(|| slot_not_found(&time, date))?;
            println!("Added seat {} at {}", id, time);
        }
        StudentCommand::Remove { seat } => {
            if !store.remove_student_slot(&seat.time, &seat.id) {
                return Err(PilarisError::NotFound(format!(
                    "seat '{}' at {} on {}",
                    seat.id, seat.time, date
                )));
            }
            println!("Removed seat {}", seat.id);
        }
        StudentCommand::Set {
            seat,
            name,
            status,
            tag,
            notes,
            trial,
        } => {
            let status = status
                .map(|s| AttendanceStatus::from_str(&s))
                .transpose()
                .map_err(PilarisError::Config)?;
            let patch = StudentPatch {
                name,
                status,
                tag,
                notes,
                is_trial: trial,
            };
            if patch.is_empty() {
                return Err(PilarisError::Config(
                    "Nothing to update: pass --name, --status, --tag, --notes or --trial"
                        .to_string(),
                ));
            }

            if !store.update_student(&seat.time, &seat.id, &patch) {
                return Err(PilarisError::NotFound(format!(
                    "seat '{}' at {} on {}",
                    seat.id, seat.time, date
                )));
            }
            println!("Updated seat {}", seat.id);
        }
    }
    Ok(())
}

fn run_service_command(
    store: &mut DayStore<FileSystemStorage>,
    currency: &str,
    cmd: ServiceCommand,
) -> Result<()> {
    let mut settings = store.settings().clone();

    match cmd {
        ServiceCommand::Add { name, price } => {
            let id = settings.add_service(&name, price)?;
            store.update_settings(settings);
            println!("Added service {} ({})", id, name);
        }
        ServiceCommand::Remove { id } => {
            settings.remove_service(&id)?;
            store.update_settings(settings);
            println!("Removed service {}", id);
        }
        ServiceCommand::Price { id, price } => {
            settings.set_service_price(&id, price)?;
            store.update_settings(settings);
            println!("Set price of {} to {}", id, format_currency(price, currency));
        }
        ServiceCommand::Rename { id, name } => {
            settings.rename_service(&id, &name)?;
            store.update_settings(settings);
            println!("Renamed {} to {}", id, name);
        }
        ServiceCommand::List => {
            print!("{}", format_service_list(&settings.services, currency));
        }
    }
    Ok(())
}
