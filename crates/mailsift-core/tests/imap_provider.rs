//! The IMAP provider against a scripted plaintext server on localhost.

#![allow(clippy::unwrap_used)]

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use mailsift_core::{Error, MailboxConfig, read_unread_mails};

const GREETING: &[u8] = b"* OK [CAPABILITY IMAP4rev1 UNSELECT] test server ready\r\n";

const MESSAGE: &str = "From: Alice <alice@x.com>\r\n\
To: bob@y.com, carol@y.com\r\n\
Cc: dave@y.com\r\n\
Subject: Hi\r\n\
Content-Type: multipart/alternative; boundary=\"b1\"\r\n\
\r\n\
--b1\r\n\
Content-Type: text/plain; charset=utf-8\r\n\
\r\n\
hello there\r\n\
--b1\r\n\
Content-Type: text/html\r\n\
\r\n\
<p>hello there</p>\r\n\
--b1--\r\n";

const ENVELOPE: &str = "(\"Mon, 1 Jan 2024 00:00:00 +0000\" \"Hi\" \
((\"Alice\" NIL \"alice\" \"x.com\")) ((\"Alice\" NIL \"alice\" \"x.com\")) \
((\"Alice\" NIL \"alice\" \"x.com\")) \
((NIL NIL \"bob\" \"y.com\")(NIL NIL \"carol\" \"y.com\")) \
((NIL NIL \"dave\" \"y.com\")) NIL NIL \"<1@x.com>\")";

type Script = Vec<(&'static str, Vec<u8>)>;

/// Accepts one connection, sends the greeting, then answers each expected
/// command line in order. Returns the lines it received.
async fn scripted_server(script: Script) -> (u16, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        let (read, mut write) = socket.into_split();
        let mut lines = BufReader::new(read).lines();
        write.write_all(GREETING).await.unwrap();

        let mut received = Vec::new();
        for (expected, reply) in script {
            let line = lines.next_line().await.unwrap().unwrap();
            assert_eq!(line, expected);
            received.push(line);
            write.write_all(&reply).await.unwrap();
        }
        received
    });

    (port, handle)
}

fn config(port: u16) -> MailboxConfig {
    MailboxConfig::new("bob", "secret", "127.0.0.1", port.to_string(), false)
}

fn reply(text: &str) -> Vec<u8> {
    text.as_bytes().to_vec()
}

#[tokio::test]
async fn sweep_over_plaintext_imap() {
    let fetch = format!(
        "* 1 FETCH (UID 7 FLAGS (\\Seen) ENVELOPE {ENVELOPE} BODY[] {{{}}}\r\n{MESSAGE})\r\n\
A0005 OK FETCH completed\r\n",
        MESSAGE.len()
    );

    let (port, server) = scripted_server(vec![
        ("A0000 LOGIN bob secret", reply("A0000 OK LOGIN completed\r\n")),
        ("A0001 NOOP", reply("A0001 OK NOOP completed\r\n")),
        (
            "A0002 SELECT INBOX",
            reply("* 1 EXISTS\r\n* 0 RECENT\r\nA0002 OK [READ-WRITE] SELECT completed\r\n"),
        ),
        (
            "A0003 UID SEARCH UNSEEN",
            reply("* SEARCH 7\r\nA0003 OK SEARCH completed\r\n"),
        ),
        (
            "A0004 UID STORE 7 +FLAGS.SILENT (\\Seen)",
            reply("A0004 OK STORE completed\r\n"),
        ),
        (
            "A0005 UID FETCH 7 (UID FLAGS ENVELOPE BODY.PEEK[])",
            fetch.into_bytes(),
        ),
        ("A0006 UNSELECT", reply("A0006 OK UNSELECT completed\r\n")),
        (
            "A0007 LOGOUT",
            reply("* BYE logging out\r\nA0007 OK LOGOUT completed\r\n"),
        ),
    ])
    .await;

    let report = read_unread_mails(&config(port)).await.unwrap();

    assert_eq!(
        report,
        "From: alice@x.com\nTo: bob@y.com,carol@y.com\nCC: dave@y.com\nSubject: Hi\n\nhello there\n\n\n"
    );
    assert_eq!(server.await.unwrap().len(), 8);
}

#[tokio::test]
async fn empty_folder_still_closes_and_logs_out() {
    let (port, server) = scripted_server(vec![
        ("A0000 LOGIN bob secret", reply("A0000 OK done\r\n")),
        ("A0001 NOOP", reply("A0001 OK done\r\n")),
        ("A0002 SELECT INBOX", reply("* 0 EXISTS\r\nA0002 OK [READ-WRITE] done\r\n")),
        ("A0003 UID SEARCH UNSEEN", reply("* SEARCH\r\nA0003 OK done\r\n")),
        ("A0004 UNSELECT", reply("A0004 OK done\r\n")),
        ("A0005 LOGOUT", reply("* BYE bye\r\nA0005 OK done\r\n")),
    ])
    .await;

    let report = read_unread_mails(&config(port)).await.unwrap();

    assert_eq!(report, "");
    let received = server.await.unwrap();
    assert_eq!(received.last().map(String::as_str), Some("A0005 LOGOUT"));
}

#[tokio::test]
async fn rejected_login_is_connection_error() {
    let (port, server) = scripted_server(vec![(
        "A0000 LOGIN bob secret",
        reply("A0000 NO [AUTHENTICATIONFAILED] Invalid credentials\r\n"),
    )])
    .await;

    let result = read_unread_mails(&config(port)).await;

    assert!(matches!(result, Err(Error::Connection(msg)) if msg.contains("Invalid credentials")));
    server.await.unwrap();
}

#[tokio::test]
async fn missing_folder_logs_out_before_failing() {
    let (port, server) = scripted_server(vec![
        ("A0000 LOGIN bob secret", reply("A0000 OK done\r\n")),
        ("A0001 NOOP", reply("A0001 OK done\r\n")),
        ("A0002 SELECT Alerts", reply("A0002 NO no such mailbox\r\n")),
        ("A0003 LOGOUT", reply("* BYE bye\r\nA0003 OK done\r\n")),
    ])
    .await;

    let result = read_unread_mails(&config(port).with_folder("Alerts")).await;

    assert!(matches!(result, Err(Error::Connection(msg)) if msg.contains("Alerts")));
    assert_eq!(server.await.unwrap().len(), 4);
}

#[tokio::test]
async fn read_only_folder_is_released_and_rejected() {
    let (port, server) = scripted_server(vec![
        ("A0000 LOGIN bob secret", reply("A0000 OK done\r\n")),
        ("A0001 NOOP", reply("A0001 OK done\r\n")),
        ("A0002 SELECT INBOX", reply("A0002 OK [READ-ONLY] done\r\n")),
        ("A0003 UNSELECT", reply("A0003 OK done\r\n")),
        ("A0004 LOGOUT", reply("* BYE bye\r\nA0004 OK done\r\n")),
    ])
    .await;

    let result = read_unread_mails(&config(port)).await;

    assert!(matches!(result, Err(Error::Connection(msg)) if msg.contains("read-only")));
    assert_eq!(server.await.unwrap().len(), 5);
}

#[tokio::test]
async fn failed_store_still_releases_the_session() {
    let (port, server) = scripted_server(vec![
        ("A0000 LOGIN bob secret", reply("A0000 OK done\r\n")),
        ("A0001 NOOP", reply("A0001 OK done\r\n")),
        ("A0002 SELECT INBOX", reply("A0002 OK [READ-WRITE] done\r\n")),
        ("A0003 UID SEARCH UNSEEN", reply("* SEARCH 3\r\nA0003 OK done\r\n")),
        (
            "A0004 UID STORE 3 +FLAGS.SILENT (\\Seen)",
            reply("A0004 NO permission denied\r\n"),
        ),
        ("A0005 UNSELECT", reply("A0005 OK done\r\n")),
        ("A0006 LOGOUT", reply("* BYE bye\r\nA0006 OK done\r\n")),
    ])
    .await;

    let result = read_unread_mails(&config(port)).await;

    assert!(matches!(result, Err(Error::MailAccess(msg)) if msg.contains("permission denied")));
    assert_eq!(server.await.unwrap().len(), 7);
}

#[tokio::test]
async fn refused_connection_is_connection_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let result = read_unread_mails(&config(port)).await;

    assert!(matches!(result, Err(Error::Connection(_))));
}
