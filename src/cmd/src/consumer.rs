use async_trait::async_trait;
use filter::FilterConsumer;
use filter::FilterDocument;
use filter::FilterError;
use serde::Serialize;
use tokio::io::AsyncWrite;
use tokio::io::AsyncWriteExt;

/// Prints the applied document to stdout as JSON.
pub struct StdoutConsumer {
    pretty: bool,
}

impl StdoutConsumer {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

pub fn to_json<T: Serialize + ?Sized>(v: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(v)
    } else {
        serde_json::to_string(v)
    }
}

/// Writes the document as one JSON value followed by a newline.
pub async fn write_document<W: AsyncWrite + Unpin>(
    w: &mut W,
    doc: &FilterDocument,
    pretty: bool,
) -> filter::Result<()> {
    let mut out = to_json(doc, pretty)?;
    out.push('\n');

    w.write_all(out.as_bytes())
        .await
        .map_err(|err| FilterError::Consumer(format!("write document: {err}")))?;
    w.flush()
        .await
        .map_err(|err| FilterError::Consumer(format!("flush document: {err}")))?;

    Ok(())
}

#[async_trait]
impl FilterConsumer for StdoutConsumer {
    async fn consume(&self, doc: &FilterDocument) -> filter::Result<()> {
        write_document(&mut tokio::io::stdout(), doc, self.pretty).await
    }
}
