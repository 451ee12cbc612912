use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use clap::Args;
use tokio::io::{self, AsyncBufReadExt, BufReader};

use crate::common::{debug, info};
use crate::config::{env, Initializer};
use crate::core::{self, menu, ShellEvent, ShellHandle, Snapshot};
use crate::{GateError, Result, Route};

/// Interactive session against the in-memory identity provider
#[derive(Args, Debug)]
pub struct SessionCommand {
    /// Configuration file path
    #[arg(long, short = 'C', env = env::CONFIG_PATH)]
    config: Option<PathBuf>,
    /// Upper bound of the simulated provider latency
    #[arg(long, env = "EVENTGATE_LATENCY_MILLISECONDS")]
    latency_ms: Option<u64>,
    /// Minimum password length
    #[arg(long)]
    min_password_len: Option<usize>,
    /// Route sign up confirmations redirect to
    #[arg(long)]
    sign_up_redirect: Option<Route>,
}

enum Flow {
    Continue,
    Quit,
}

impl SessionCommand {
    pub async fn run(self) -> Result<()> {
        let SessionCommand {
            config,
            latency_ms,
            min_password_len,
            mut sign_up_redirect,
        } = self;

        let mut initializer = match config {
            Some(path) => Initializer::load_config_file(path).await?,
            None => Initializer::default(),
        };

        let mut overrides = {
            let mut config = core::Config::default();
            config.auth.set_min_password_len(min_password_len);
            config.auth.set_sign_up_redirect(&mut sign_up_redirect);
            config
        };
        initializer.config.shell.override_merge(&mut overrides);

        let mut provider = initializer.provider();
        if let Some(max_ms) = latency_ms {
            provider = provider.with_latency(0, max_ms);
        }
        debug!(
            users = initializer.config.shell.users.len(),
            "Session configured"
        );

        let (shell, handle, mut events) = initializer.build_shell(Arc::new(provider)).await?;
        let shell_task = tokio::spawn(shell.run());
        let printer = tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                print_event(&event);
            }
        });

        print_help();
        let mut lines = BufReader::new(io::stdin()).lines();
        loop {
            let line = tokio::select! {
                line = lines.next_line() => line?,
                _ = tokio::signal::ctrl_c() => None,
            };
            let Some(line) = line else { break };
            match dispatch(&handle, &line).await {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(GateError::ShellClosed) => return Err(GateError::ShellClosed),
                Err(err) => eprintln!("{}", err),
            }
        }

        info!("Shutting down session");
        handle.shutdown().await?;
        shell_task
            .await
            .map_err(|err| GateError::Internal(err.to_string()))?;
        printer
            .await
            .map_err(|err| GateError::Internal(err.to_string()))?;

        Ok(())
    }
}

// Command word and the untouched rest of the line.
fn split_command(line: &str) -> (&str, &str) {
    let line = line.trim_start().trim_end_matches(['\r', '\n']);
    match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest),
        None => (line.trim_end(), ""),
    }
}

async fn dispatch(handle: &ShellHandle, line: &str) -> Result<Flow> {
    let (command, raw) = split_command(line);
    let arg = raw.trim();

    match command {
        "" => {}
        "go" => handle.request_navigation(Route::from_str(arg)?).await?,
        "click" => {
            let snapshot = handle.snapshot().await?;
            match menu::find(&snapshot.menu, arg) {
                Some(item) => handle.activate(item.action.clone()).await?,
                None => println!("no menu item {:?}", arg),
            }
        }
        "open" => handle.open_auth_flow().await?,
        "close" => handle.close_auth_flow().await?,
        "email" => handle.set_email(arg).await?,
        // Spaces are part of the secret.
        "password" => handle.set_password(raw).await?,
        "toggle" => handle.toggle_mode().await?,
        "submit" => handle.submit().await?,
        "sign-out" => handle.sign_out().await?,
        "state" => print_state(&handle.snapshot().await?),
        "menu" => print_menu(&handle.snapshot().await?),
        "help" => print_help(),
        "quit" | "exit" => return Ok(Flow::Quit),
        unknown => println!("unknown command {:?}. type help", unknown),
    }
    Ok(Flow::Continue)
}

fn print_event(event: &ShellEvent) {
    match event {
        ShellEvent::Navigated(route) => println!("-> {}", route),
        ShellEvent::AuthOpened => println!("[auth] opened"),
        ShellEvent::AuthClosed(reason) => println!("[auth] closed ({:?})", reason),
        ShellEvent::Notice(notice) => println!("[notice] {}", notice),
        ShellEvent::IdentityChanged(Some(identity)) => {
            println!("[session] signed in as {}", identity)
        }
        ShellEvent::IdentityChanged(None) => println!("[session] signed out"),
    }
}

fn print_state(snapshot: &Snapshot) {
    match &snapshot.identity {
        Some(identity) => println!("identity: {}", identity),
        None => println!("identity: -"),
    }
    match &snapshot.pending {
        Some(route) => println!("pending:  {}", route),
        None => println!("pending:  -"),
    }
    match &snapshot.auth {
        Some(auth) => {
            println!(
                "auth:     {} email={:?} submitting={}",
                auth.mode, auth.email, auth.submitting
            );
            if let Some(err) = &auth.last_error {
                println!("error:    {}", err);
            }
        }
        None => println!("auth:     closed"),
    }
}

fn print_menu(snapshot: &Snapshot) {
    for item in &snapshot.menu {
        println!("  {}", item.label);
    }
}

fn print_help() {
    println!(
        "commands: go <route> | click <menu label> | open | close | email <address> | \
         password <secret> | toggle | submit | sign-out | state | menu | quit"
    );
}
