//! Greeting ingress: validate the name, queue it, render the page.

use namecount_queue::NameQueue;

use crate::HandlerError;

/// Render the greeting page for a name.
///
/// The name is HTML-escaped before it is embedded: it arrives straight from
/// a path parameter, so reflecting it raw would hand out an XSS vector.
pub fn greeting_page(name: &str) -> String {
    format!(
        r#"<h1 style="width: 100vw;text-align:center;margin-top: 40vh;">Hello {}</h1>"#,
        escape_html(name)
    )
}

/// Handle one greeting request.
///
/// The name is queued before the response is built; success therefore means
/// the name was durably accepted by the queue. The response never waits for
/// the count to be persisted - "seen" and "counted" converge eventually.
pub async fn handle_greet(name: &str, queue: &dyn NameQueue) -> Result<String, HandlerError> {
    if name.trim().is_empty() {
        return Err(HandlerError::InvalidName {
            reason: "name must not be empty".to_string(),
        });
    }

    queue.send(name).await.map_err(|e| {
        tracing::error!(name, error = %e, "failed to queue greeted name");
        HandlerError::from(e)
    })?;

    tracing::debug!(name, "greeted and queued");
    Ok(greeting_page(name))
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use namecount_queue::in_memory;

    #[test]
    fn page_embeds_the_name() {
        let page = greeting_page("alice");
        assert!(page.contains("Hello alice"));
        assert!(page.starts_with("<h1"));
    }

    #[test]
    fn page_escapes_markup_in_names() {
        let page = greeting_page("<script>alert(1)</script>");
        assert!(!page.contains("<script>"));
        assert!(page.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));

        let page = greeting_page(r#""O'Brien" & sons"#);
        assert!(page.contains("&quot;O&#39;Brien&quot; &amp; sons"));
    }

    #[tokio::test]
    async fn greet_queues_before_responding() {
        let (queue, mut consumer) = in_memory();

        let page = handle_greet("alice", &queue).await.unwrap();
        assert!(page.contains("Hello alice"));

        let batch = consumer.next_batch(10).await.unwrap();
        assert_eq!(batch, vec!["alice"]);
    }

    #[tokio::test]
    async fn empty_names_are_rejected() {
        let (queue, _consumer) = in_memory();

        let err = handle_greet("", &queue).await.unwrap_err();
        assert_eq!(err.status_code(), 400);

        let err = handle_greet("   ", &queue).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn queue_failure_is_propagated_not_swallowed() {
        let (queue, consumer) = in_memory();
        drop(consumer);

        let err = handle_greet("alice", &queue).await.unwrap_err();
        assert_eq!(err.status_code(), 502);
        assert_eq!(err.error_type(), "QueueFailed");
    }
}
