use super::{Exchange, Interceptor};
use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Writes each exchange to its own markdown file under a directory.
#[derive(Debug)]
pub struct FileInterceptor {
    base_path: PathBuf,
}

impl FileInterceptor {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self { base_path: base_path.into() }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

fn render(exchange: &Exchange<'_>) -> String {
    format!(
        "# {}\n\nModel: `{}`\n\n## Prompt\n\n{}\n\n## Response\n\n{}\n",
        exchange.purpose, exchange.model, exchange.prompt, exchange.response
    )
}

#[async_trait]
impl Interceptor for FileInterceptor {
    async fn save(&self, exchange: &Exchange<'_>) -> std::io::Result<()> {
        let timestamp = Utc::now();
        let filename = format!(
            "{}_{}.md",
            exchange.purpose,
            timestamp.format("%Y%m%d_%H%M%S_%3f")
        );
        let file_path = self.base_path.join(filename);

        fs::create_dir_all(&self.base_path).await?;

        let mut file = fs::File::create(&file_path).await?;
        file.write_all(render(exchange).as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcript_layout() {
        let exchange = Exchange {
            purpose: "quiz",
            model: "deepseek-chat",
            prompt: "Make a quiz",
            response: "1. Why?",
        };
        let text = render(&exchange);
        assert!(text.starts_with("# quiz\n"));
        assert!(text.contains("## Prompt\n\nMake a quiz"));
        assert!(text.contains("## Response\n\n1. Why?"));
    }
}
