use respc::{PubSubMessage, RedisError, Value};

/// Render a reply the way redis-cli prints it
pub fn format_value(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value, 0);
    out
}

fn write_value(out: &mut String, value: &Value, indent: usize) {
    match value {
        Value::Nil => out.push_str("(nil)"),
        Value::Int(i) => out.push_str(&format!("(integer) {}", i)),
        Value::Status(s) => out.push_str(s),
        Value::Data(data) => out.push_str(&quote(data)),
        Value::Bulk(items) if items.is_empty() => out.push_str("(empty array)"),
        Value::Bulk(items) => {
            let width = items.len().to_string().len();
            for (idx, item) in items.iter().enumerate() {
                if idx > 0 {
                    out.push('\n');
                    out.push_str(&" ".repeat(indent));
                }
                let label = format!("{:>width$}) ", idx + 1, width = width);
                out.push_str(&label);
                write_value(out, item, indent + label.len());
            }
        }
    }
}

pub fn format_error(err: &RedisError) -> String {
    match err {
        RedisError::Server(e) => format!("(error) {}", e),
        other => format!("(error) {}", other),
    }
}

/// Subscriber output mirrors the raw three or four element arrays
pub fn format_message(message: &PubSubMessage) -> String {
    let text = |s: &str| Value::Data(s.as_bytes().to_vec().into());
    let name = |s: &Option<String>| s.as_deref().map(text).unwrap_or(Value::Nil);

    let items = match message {
        PubSubMessage::Subscribe { channel, count } => {
            vec![text("subscribe"), text(channel), Value::Int(*count)]
        }
        PubSubMessage::Unsubscribe { channel, count } => {
            vec![text("unsubscribe"), name(channel), Value::Int(*count)]
        }
        PubSubMessage::PSubscribe { pattern, count } => {
            vec![text("psubscribe"), text(pattern), Value::Int(*count)]
        }
        PubSubMessage::PUnsubscribe { pattern, count } => {
            vec![text("punsubscribe"), name(pattern), Value::Int(*count)]
        }
        PubSubMessage::Message { channel, payload } => {
            vec![text("message"), text(channel), Value::Data(payload.clone())]
        }
        PubSubMessage::PMessage {
            pattern,
            channel,
            payload,
        } => vec![
            text("pmessage"),
            text(pattern),
            text(channel),
            Value::Data(payload.clone()),
        ],
    };
    format_value(&Value::Bulk(items))
}

fn quote(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() + 2);
    out.push('"');
    for &b in data {
        match b {
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            0x20..=0x7e => out.push(b as char),
            _ => out.push_str(&format!("\\x{:02x}", b)),
        }
    }
    out.push('"');
    out
}

/// Split an input line into arguments. Double quotes allow escapes, single
/// quotes are taken literally.
pub fn split_line(line: &str) -> Result<Vec<String>, String> {
    let mut args = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        while chars.peek().map_or(false, |c| c.is_whitespace()) {
            chars.next();
        }
        let Some(&first) = chars.peek() else {
            return Ok(args);
        };

        let mut current = String::new();
        match first {
            '"' => {
                chars.next();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some('n') => current.push('\n'),
                            Some('r') => current.push('\r'),
                            Some('t') => current.push('\t'),
                            Some(c) => current.push(c),
                            None => return Err("unbalanced quotes".to_string()),
                        },
                        Some(c) => current.push(c),
                        None => return Err("unbalanced quotes".to_string()),
                    }
                }
            }
            '\'' => {
                chars.next();
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => current.push(c),
                        None => return Err("unbalanced quotes".to_string()),
                    }
                }
            }
            _ => {
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() {
                        break;
                    }
                    current.push(c);
                    chars.next();
                }
            }
        }
        args.push(current);
    }
}
