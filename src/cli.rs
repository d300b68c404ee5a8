use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Chat with weather, calculator and dictionary plugins", long_about = None)]
pub struct Args {
    /// Message to handle once, e.g. "/calc 2 * (3 + 4)"; starts a chat session when omitted
    pub query: Option<String>,

    /// Never contact lookup services; weather and dictionary answer from built-in data
    #[arg(long)]
    pub offline: bool,

    /// Lookup request timeout in seconds
    #[arg(short, long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Print debug logs to stderr
    #[arg(short, long)]
    pub debug: bool,
}
