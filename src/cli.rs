#[derive(clap::Parser, Debug)]
#[command(name = "ipquizgenerator", version, about = "Übungsfragen zur IPv4-Adressrechnung")]
pub enum Command {
    Gen {
        #[arg(short, long, default_value_t = 10)]
        count: u32,
        #[arg(short, long)]
        kind: Option<String>,
        #[arg(short, long)]
        solutions: bool,
    },
    Drill {
        #[arg(short, long, default_value_t = 10)]
        count: u32,
        #[arg(short, long)]
        kind: Option<String>,
    },
    Kinds,
}
