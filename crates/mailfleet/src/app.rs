use clap::{Arg, ArgAction, Command, value_parser};

pub fn build_cli() -> Command {
    Command::new("mailfleet")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Monitor a fleet of mail servers and their polling jobs")
        .long_about("mailfleet talks to the mail-fleet backend API. It lists servers, domains and mailbox accounts, prints the fleet report, and starts and watches the background jobs that poll every server.")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("api-url")
                .long("api-url")
                .help("Backend API base URL (overrides config and MAILFLEET_API_URL)")
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("servers")
                .about("List monitored mail servers")
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("domains")
                .about("List the domains hosted on a server")
                .arg(
                    Arg::new("server-id")
                        .help("Server id (see 'mailfleet servers')")
                        .required(true)
                        .index(1),
                )
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("accounts")
                .about("List the mailbox accounts of a domain")
                .arg(
                    Arg::new("domain-id")
                        .help("Domain id (see 'mailfleet domains')")
                        .required(true)
                        .index(1),
                )
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("summary")
                .about("Show fleet counters and the last snapshot time")
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("report")
                .about("Show the full fleet report with an overview")
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("add-server")
                .about("Register a new mail server")
                .arg(Arg::new("name").long("name").help("Display name").required(true))
                .arg(
                    Arg::new("hostname")
                        .long("hostname")
                        .help("Hostname or IP address")
                        .required(true),
                )
                .arg(
                    Arg::new("cli-port")
                        .long("cli-port")
                        .help("CLI port of the mail server")
                        .value_parser(value_parser!(u16))
                        .default_value("7000"),
                )
                .arg(
                    Arg::new("webadmin-port")
                        .long("webadmin-port")
                        .help("WebAdmin port of the mail server")
                        .value_parser(value_parser!(u16))
                        .default_value("9000"),
                )
                .arg(
                    Arg::new("username")
                        .long("username")
                        .help("Admin username")
                        .required(true),
                )
                .arg(
                    Arg::new("password")
                        .long("password")
                        .help("Admin password")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("delete-server")
                .about("Remove a mail server by hostname")
                .arg(
                    Arg::new("hostname")
                        .help("Hostname of the server to delete")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("force")
                        .long("force")
                        .short('f')
                        .help("Skip the confirmation prompt")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("jobs")
                .about("Run, inspect and watch polling jobs")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(
                    Command::new("list")
                        .about("List recent jobs, newest first")
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .short('n')
                                .help("Maximum number of jobs (overrides config)")
                                .value_parser(value_parser!(usize)),
                        )
                        .arg(json_arg()),
                )
                .subcommand(
                    Command::new("show")
                        .about("Show one job with per-server results")
                        .arg(job_id_arg())
                        .arg(json_arg()),
                )
                .subcommand(
                    Command::new("log")
                        .about("Print the log of one server within a job")
                        .arg(job_id_arg())
                        .arg(
                            Arg::new("server-id")
                                .help("Server id within the job")
                                .required(true)
                                .index(2),
                        ),
                )
                .subcommand(
                    Command::new("run")
                        .about("Start a new polling job")
                        .arg(
                            Arg::new("max-parallel")
                                .long("max-parallel")
                                .help("Maximum servers polled at once (overrides config)")
                                .value_parser(value_parser!(u32).range(1..)),
                        )
                        .arg(
                            Arg::new("watch")
                                .long("watch")
                                .short('w')
                                .help("Watch the job until it finishes")
                                .action(ArgAction::SetTrue),
                        )
                        .arg(interval_arg()),
                )
                .subcommand(
                    Command::new("watch")
                        .about("Watch a job live until it reaches a terminal status")
                        .arg(job_id_arg())
                        .arg(interval_arg()),
                ),
        )
}

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .help("Output in JSON format")
        .action(ArgAction::SetTrue)
}

fn job_id_arg() -> Arg {
    Arg::new("job-id").help("Job id").required(true).index(1)
}

fn interval_arg() -> Arg {
    Arg::new("interval")
        .long("interval")
        .short('i')
        .help("Poll interval in milliseconds (overrides config)")
        .value_parser(value_parser!(u64).range(1..))
}
