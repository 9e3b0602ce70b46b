// Pipeline — the full summarization run, shared by the CLI commands.

pub mod run;
