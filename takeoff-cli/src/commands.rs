//! Command handlers.

use std::io::Write;

use anyhow::{Context, Result};
use embedding::{EmbeddingConfig, EmbeddingProvider, EmbeddingService};
use fake_embedding::DeterministicFakeEmbedding;
use futures::StreamExt;
use llm_client::{ClientConfig, LlmClient, TitanTakeoff, TitanTakeoffPro};
use takeoff_embedding::TitanTakeoffEmbed;
use tracing::info;

use crate::cli::{self, Cli, Commands};

/// Dispatches a parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Generate {
            prompt,
            pro,
            consumer_group,
            max_length,
            temperature,
            top_k,
            top_p,
        } => {
            let config = cli::load_client_config(&cli.server)?;
            let llm: Box<dyn LlmClient> = if pro {
                let options =
                    cli::load_pro_options(consumer_group, max_length, temperature, top_k, top_p)?;
                Box::new(TitanTakeoffPro::new(config).await?.with_options(options))
            } else {
                Box::new(TitanTakeoff::new(config).await?)
            };
            let text = llm.invoke(&prompt).await.context("Takeoff generate")?;
            println!("{}", text);
            Ok(())
        }
        Commands::Stream { prompt } => {
            let config = cli::load_client_config(&cli.server)?.with_streaming(true);
            let llm = TitanTakeoff::new(config).await?;
            let mut stream = llm.stream(&prompt).await.context("Takeoff generate_stream")?;
            let mut stdout = std::io::stdout();
            let mut fragments = 0usize;
            while let Some(fragment) = stream.next().await {
                let fragment = fragment?;
                stdout.write_all(fragment.as_bytes())?;
                stdout.flush()?;
                fragments += 1;
            }
            writeln!(stdout)?;
            info!(fragments, "stream finished");
            Ok(())
        }
        Commands::Embed {
            texts,
            provider,
            consumer_group,
        } => {
            let embedding_config = cli::load_embedding_config(provider, consumer_group)?;
            let service = build_embedding_service(&embedding_config, &cli.server).await?;
            let vectors = service.embed_batch(&texts).await?;
            for vector in vectors {
                println!("{}", serde_json::to_string(&vector)?);
            }
            Ok(())
        }
    }
}

/// Builds the configured embedding provider. Takeoff readers are provisioned here.
pub async fn build_embedding_service(
    config: &dyn EmbeddingConfig,
    server: &cli::ServerArgs,
) -> Result<Box<dyn EmbeddingService>> {
    info!(provider = %config.provider(), "step: building embedding service");
    Ok(match config.provider() {
        EmbeddingProvider::TitanTakeoff => {
            let ClientConfig {
                base_url,
                port,
                mgmt_port,
                readers,
                ..
            } = cli::load_client_config(server)?;
            let mut service = TitanTakeoffEmbed::connect(&base_url, port, mgmt_port, readers).await?;
            if let Some(group) = config.consumer_group() {
                service = service.with_consumer_group(group);
            }
            Box::new(service)
        }
        EmbeddingProvider::DeterministicFake => {
            Box::new(DeterministicFakeEmbedding::new(config.fake_dimension()))
        }
    })
}
