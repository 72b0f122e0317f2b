use anyhow::Result;
use clap::Parser;
use colored::*;

use testing_tools::api_client::ApiClient;
use testing_tools::auth::{login, UserCredentials};
use testing_tools::output::print_test_summary;
use testing_tools::scenarios::{self, TestEnvironment};
use testing_tools::sse_client::Connection;

#[derive(Parser)]
#[command(name = "sse-test-client")]
#[command(about = "SSE Integration Testing Tool")]
struct Cli {
    /// Base URL of the backend (e.g., http://localhost:8080)
    #[arg(long)]
    base_url: String,

    /// User 1 credentials (format: username:password)
    #[arg(long)]
    user1: String,

    /// User 2 credentials (format: username:password)
    #[arg(long)]
    user2: String,

    /// Test scenario to run
    #[arg(long, value_enum)]
    scenario: ScenarioChoice,

    /// Enable verbose output
    #[arg(long, short)]
    verbose: bool,
}

#[derive(clap::ValueEnum, Clone, PartialEq)]
enum ScenarioChoice {
    /// Test basic SSE connection without creating any data
    ConnectionTest,
    /// Test card_update after creating a card
    CardCreate,
    /// Test card_update after a second user joins a card
    CardJoin,
    /// Test column_update after renaming a column
    ColumnRename,
    /// Test card_deleted after deleting a card
    CardDelete,
    /// Run all tests
    All,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    }

    println!("{}", "=== SETUP PHASE ===".bright_white().bold());

    let user1_creds = UserCredentials::parse(&cli.user1)?;
    let user2_creds = UserCredentials::parse(&cli.user2)?;

    println!("{} Authenticating users...", "→".blue());
    let client = reqwest::Client::new();
    let user1 = login(&client, &cli.base_url, &user1_creds).await?;
    let user2 = login(&client, &cli.base_url, &user2_creds).await?;

    println!(
        "{} User 1 authenticated (ID: {})",
        "✓".green(),
        user1.user_id
    );
    println!(
        "{} User 2 authenticated (ID: {})",
        "✓".green(),
        user2.user_id
    );

    let api_client = ApiClient::new(client.clone(), cli.base_url.clone());

    // Establish SSE connections before any data is created so no event is missed
    println!("\n{} Establishing SSE connections...", "→".blue());
    let mut sse1 = Connection::establish(&cli.base_url, "User 1".to_string()).await?;
    let mut sse2 = Connection::establish(&cli.base_url, "User 2".to_string()).await?;

    println!("{} User 1 SSE connection established", "✓".green());
    println!("{} User 2 SSE connection established", "✓".green());

    let test_env: Option<TestEnvironment> = if cli.scenario == ScenarioChoice::ConnectionTest {
        println!(
            "\n{} Skipping test environment setup (not needed for this test)",
            "→".blue()
        );
        None
    } else {
        println!("\n{} Creating test board and column...", "→".blue());
        let env = scenarios::setup_test_environment(&api_client, &user1, &user2).await?;
        println!("{} Board created (ID: {})", "✓".green(), env.board_id);
        println!("{} Column created (ID: {})", "✓".green(), env.column_id);
        Some(env)
    };

    println!("\n{}", "=== TEST PHASE ===".bright_white().bold());

    let mut results = Vec::new();

    if matches!(cli.scenario, ScenarioChoice::ConnectionTest | ScenarioChoice::All) {
        results.push(scenarios::test_connection(&user1, &user2).await?);
    }

    if let Some(env) = test_env.as_ref() {
        let run = |choice: ScenarioChoice| cli.scenario == choice || cli.scenario == ScenarioChoice::All;

        if run(ScenarioChoice::CardCreate) {
            results.push(scenarios::test_card_create(&user1, env, &api_client, &mut sse2).await?);
        }
        if run(ScenarioChoice::CardJoin) {
            results.push(
                scenarios::test_card_join(&user1, &user2, env, &api_client, &mut sse1).await?,
            );
        }
        if run(ScenarioChoice::ColumnRename) {
            results
                .push(scenarios::test_column_rename(&user1, env, &api_client, &mut sse2).await?);
        }
        if run(ScenarioChoice::CardDelete) {
            results.push(scenarios::test_card_delete(&user1, env, &api_client, &mut sse2).await?);
        }
    }

    println!("\n{}", "=== RESULTS ===".bright_white().bold());
    print_test_summary(&results);

    let all_passed = results.iter().all(|r| r.passed);

    if all_passed {
        println!("\n{}", "All tests passed! ✓".bright_green().bold());
    } else {
        println!("\n{}", "Some tests failed! ✗".bright_red().bold());
    }

    std::process::exit(if all_passed { 0 } else { 1 });
}
