use std::process::ExitCode;

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use common::format::format_currency;
use dotenvy::dotenv;
use models::PolicyType;
use service::controllers::{App, ClaimForm, ControllerError, Navigation, NoticeKind, PurchaseForm};
use service::guard::Decision;
use service::pricing::{CoverageLevel, PaymentFrequency};
use tracing::{debug, error};

/// Command-line client for the Zurince insurance backend.
#[derive(Parser, Debug)]
#[command(name = "zurince", version, about)]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,
    /// Print list results as JSON instead of tables
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and store the session locally
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign out; the local session is cleared even if the server is unreachable
    Logout,
    /// Show the signed-in user
    Whoami,
    Dashboard,
    /// List your policies
    Policies,
    /// Show one policy and its claims
    Policy { id: String },
    /// Renew an expired or cancelled policy from today
    Renew { id: String },
    /// List insurance products on sale
    Products,
    /// Price indication for a product type
    Quote(QuoteArgs),
    /// Buy a product
    Purchase {
        #[arg(long)]
        product: String,
        #[command(flatten)]
        plan: PlanArgs,
    },
    /// List your claims
    Claims,
    /// File a claim against a policy
    SubmitClaim {
        #[arg(long)]
        policy: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        amount: f64,
        /// Incident date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Directory users (admin only)
    Users,
    /// Admin overview (admin only)
    Admin,
    /// Accounts registered with the insurance backend (admin only)
    Accounts,
    /// Find a backend account by email (admin only)
    Lookup {
        #[arg(long)]
        email: String,
    },
    /// Evaluate the route guard for a path
    Route { path: String },
}

#[derive(Args, Debug)]
struct QuoteArgs {
    #[arg(long = "type")]
    policy_type: PolicyType,
    #[command(flatten)]
    plan: PlanArgs,
}

#[derive(Args, Debug)]
struct PlanArgs {
    #[arg(long, default_value = "standard")]
    level: CoverageLevel,
    #[arg(long, default_value = "annually")]
    frequency: PaymentFrequency,
}

fn init_logging(json: bool) {
    dotenv().ok();
    if json {
        common::utils::logging::init_logging_json();
    } else {
        common::utils::logging::init_logging_default();
    }
    debug!(event = "logger_init", "tracing subscriber initialized");
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_json);

    // single logical thread of control
    let rt = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run(cli)) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = configs::AppConfig::load_and_validate()?;
    let app = service::runtime::bootstrap(&config).await?;
    let today = Local::now().date_naive();

    match execute(&app, cli.command, cli.json, today).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            match (&e, e.code()) {
                (ControllerError::Redirect(route), _) => eprintln!("{} (redirect to {route})", e.notice()),
                (_, Some(code)) => eprintln!("{} [code {code}]", e.notice()),
                (_, None) => eprintln!("{}", e.notice()),
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

fn announce(nav: &Navigation) {
    let marker = match nav.notice.kind {
        NoticeKind::Success => "ok",
        NoticeKind::Warning => "warning",
        NoticeKind::Error => "error",
    };
    println!("[{marker}] {}", nav.notice);
    println!("-> {}", nav.route);
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), ControllerError> {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => error!(error = %e, "failed to render JSON"),
    }
    Ok(())
}

async fn execute(app: &App, command: Command, json: bool, today: NaiveDate) -> Result<(), ControllerError> {
    match command {
        Command::Login { email, password } => announce(&app.login(&email, &password).await?),
        Command::Logout => announce(&app.logout().await?),
        Command::Whoami => {
            let p = app.profile()?;
            println!("{} <{}> role={:?} id={}", p.name, p.masked_email, p.role, p.id);
        }
        Command::Dashboard => {
            let d = app.dashboard(today).await?;
            println!("Welcome back, {}", d.greeting_name);
            println!("active policies:   {}", d.active_policies);
            println!("pending claims:    {}", d.pending_claims);
            println!("total coverage:    {}", format_currency(d.total_active_coverage));
            match d.next_renewal {
                Some(date) => println!("renewals due:      {} (next {date})", d.upcoming_renewals.len()),
                None => println!("renewals due:      none in the next 30 days"),
            }
            for p in &d.highlighted {
                println!("  {:<10} {:<8} until {}", p.id, p.policy_type.label(), p.end_date);
            }
        }
        Command::Policies => {
            let policies = app.policies().await?;
            if json {
                return print_json(&policies);
            }
            for p in &policies {
                println!(
                    "{:<10} {:<8} {:<9} {:>14} cover {:>16}  {} .. {}",
                    p.id,
                    p.policy_type.label(),
                    format!("{:?}", p.status),
                    format_currency(p.premium),
                    format_currency(p.coverage_limit),
                    p.start_date,
                    p.end_date
                );
            }
        }
        Command::Policy { id } => {
            let d = app.policy_detail(&id, today).await?;
            if json {
                return print_json(&d.policy);
            }
            let p = &d.policy;
            println!("{} {} ({:?})", p.insurance_product.name, p.id, p.status);
            println!("premium {}  coverage {}", format_currency(p.premium), format_currency(p.coverage_limit));
            println!("{} .. {} ({} days left)", p.start_date, p.end_date, d.days_until_end);
            if d.renewable {
                println!("renewable: zurince renew {}", p.id);
            }
            for c in &d.claims {
                println!("  claim {:<10} {} {:>14} {}", c.id, c.date, format_currency(c.amount), c.status.label());
            }
        }
        Command::Renew { id } => announce(&app.renew(&id, today).await?),
        Command::Products => {
            let products = app.products().await?;
            if json {
                return print_json(&products);
            }
            for p in &products {
                println!("{:<12} {:<8} {:<24} from {}", p.id, p.product_type.label(), p.name, format_currency(p.base_price));
            }
        }
        Command::Quote(args) => {
            let q = app.quote(args.policy_type, args.plan.level, args.plan.frequency)?;
            println!(
                "{} {}: coverage {}, premium {}{}",
                q.policy_type.label(),
                q.level.label(),
                format_currency(q.coverage),
                format_currency(q.premium),
                q.frequency.suffix()
            );
        }
        Command::Purchase { product, plan } => {
            let form = PurchaseForm { product_id: product, level: plan.level, frequency: plan.frequency };
            announce(&app.purchase(form, today).await?);
        }
        Command::Claims => {
            let rows = app.claims().await?;
            if json {
                let claims: Vec<_> = rows.iter().map(|r| &r.claim).collect();
                return print_json(&claims);
            }
            for r in &rows {
                println!(
                    "{:<10} {:<8} {} {:>14} {}",
                    r.claim.id,
                    r.policy_type,
                    r.claim.date,
                    format_currency(r.claim.amount),
                    r.claim.status.label()
                );
            }
        }
        Command::SubmitClaim { policy, description, amount, date } => {
            let form = ClaimForm { policy_id: policy, description, amount, date };
            announce(&app.submit_claim(form, today).await?);
        }
        Command::Users => {
            for u in app.admin_users().await? {
                println!("{:<6} {:<24} {}", u.id, u.name, u.masked_email);
            }
        }
        Command::Admin => {
            let d = app.admin_dashboard().await?;
            println!("users: {}  active policies: {}  pending claims: {}", d.user_count, d.active_policies, d.pending_claims);
            for u in &d.recent_users {
                println!("  {:<6} {:<24} {}", u.id, u.name, u.masked_email);
            }
        }
        Command::Accounts => {
            let rows = app.admin_accounts().await?;
            if json {
                return print_json(&rows);
            }
            for u in &rows {
                println!("{:<6} {:<24} {:<24} {:?}", u.id, u.name, u.masked_email, u.role);
            }
        }
        Command::Lookup { email } => match app.admin_lookup(&email).await? {
            Some(u) => println!("{} {} <{}> role={:?}", u.id, u.name, u.masked_email, u.role),
            None => println!("no account for {email}"),
        },
        Command::Route { path } => {
            let (route, decision) = app.navigate(&path);
            match decision {
                Decision::Allow => println!("{route}: allow"),
                Decision::Redirect(to) => println!("{route}: redirect to {to}"),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_quote_options() {
        let cli = Cli::parse_from(["zurince", "quote", "--type", "car", "--level", "premium", "--frequency", "monthly"]);
        match cli.command {
            Command::Quote(q) => {
                assert_eq!(q.policy_type, PolicyType::Car);
                assert_eq!(q.plan.level, CoverageLevel::Premium);
                assert_eq!(q.plan.frequency, PaymentFrequency::Monthly);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_lookup_email() {
        let cli = Cli::parse_from(["zurince", "lookup", "--email", "aida@x.com"]);
        assert!(matches!(cli.command, Command::Lookup { email } if email == "aida@x.com"));
    }
}
