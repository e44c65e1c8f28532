use clap::Args;
use fabrima_app::context::AppContext;

#[derive(Debug, Args)]
pub(crate) struct AskArgs {
    /// Styling question
    query: String,

    /// What the user is currently looking at
    #[arg(long)]
    context: Option<String>,
}

pub(crate) async fn run(context: &AppContext, args: AskArgs) -> Result<(), String> {
    println!("{}", answer(context, args).await);

    Ok(())
}

async fn answer(context: &AppContext, args: AskArgs) -> String {
    context.stylist.advise(args.query, args.context).await
}
