//! Client behaviour against a scripted server.

use rouilleftp::{ClientConn, FtpError};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

/// What the scripted server does with one command line.
enum Step {
    Reply(&'static str),
    /// Opens a data listener and announces it with a 227 reply.
    Passive,
    /// Preliminary reply, bytes sent on the data connection, final reply.
    Send(&'static str, &'static [u8], &'static str),
    /// Preliminary reply, read the data connection to the end, final reply.
    Receive(&'static str, &'static str),
    Close,
}

async fn reply(writer: &mut TcpStream, text: &str) {
    writer
        .write_all(format!("{}\r\n", text).as_bytes())
        .await
        .unwrap();
}

/// Serves one control connection with `script`. Uploaded bytes come out of
/// the returned channel.
async fn fake_server(
    greeting: &'static str,
    script: fn(&str) -> Step,
) -> (String, mpsc::UnboundedReceiver<Vec<u8>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    let (uploads, received) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        reply(&mut socket, greeting).await;

        let mut data_listener: Option<TcpListener> = None;
        loop {
            let mut line = String::new();
            {
                let mut reader = BufReader::new(&mut socket);
                if reader.read_line(&mut line).await.unwrap_or(0) == 0 {
                    break;
                }
            }

            match script(line.trim_end()) {
                Step::Reply(text) => reply(&mut socket, text).await,
                Step::Passive => {
                    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
                    let port = listener.local_addr().unwrap().port();
                    data_listener = Some(listener);
                    let text = format!(
                        "227 Entering Passive Mode (127,0,0,1,{},{})",
                        port / 256,
                        port % 256
                    );
                    reply(&mut socket, &text).await;
                }
                Step::Send(first, body, last) => {
                    let listener = data_listener.take().unwrap();
                    reply(&mut socket, first).await;
                    let (mut data, _) = listener.accept().await.unwrap();
                    data.write_all(body).await.unwrap();
                    data.shutdown().await.unwrap();
                    drop(data);
                    reply(&mut socket, last).await;
                }
                Step::Receive(first, last) => {
                    let listener = data_listener.take().unwrap();
                    reply(&mut socket, first).await;
                    let (mut data, _) = listener.accept().await.unwrap();
                    let mut body = Vec::new();
                    data.read_to_end(&mut body).await.unwrap();
                    uploads.send(body).unwrap();
                    reply(&mut socket, last).await;
                }
                Step::Close => break,
            }
        }
    });

    (addr, received)
}

fn legacy_only(line: &str) -> Step {
    match line {
        "FEAT" => Step::Reply("502 Command not implemented."),
        "EPSV" => Step::Reply("502 Command not implemented."),
        "PASV" => Step::Passive,
        "NLST" => Step::Send("150 Here it comes.", b"a.txt\r\nb c.txt\r\n", "226 Done."),
        "STOR up.txt" => Step::Receive("125 Go ahead.", "226 Stored."),
        "QUIT" => Step::Reply("221 Bye."),
        _ => Step::Reply("500 Unexpected."),
    }
}

#[tokio::test]
async fn test_falls_back_to_pasv() {
    let (addr, mut uploads) = fake_server("220 Fake ready.", legacy_only).await;
    let mut conn = ClientConn::dial(&addr).await.unwrap();
    assert!(conn.features().is_empty());

    assert_eq!(conn.name_list("").await.unwrap(), vec!["a.txt", "b c.txt"]);

    conn.stor("up.txt", &mut &b"uploaded"[..]).await.unwrap();
    assert_eq!(uploads.recv().await.unwrap(), b"uploaded");

    conn.quit().await.unwrap();
}

fn no_passive(line: &str) -> Step {
    match line {
        "FEAT" => Step::Reply("211 No features"),
        "EPSV" => Step::Reply("502 Command not implemented."),
        "PASV" => Step::Reply("227 Entering Passive Mode"),
        _ => Step::Reply("500 Unexpected."),
    }
}

#[tokio::test]
async fn test_negotiation_failure_reports_both_attempts() {
    let (addr, _uploads) = fake_server("220 Fake ready.", no_passive).await;
    let mut conn = ClientConn::dial(&addr).await.unwrap();

    match conn.list("").await {
        Err(FtpError::Negotiation { extended, legacy }) => {
            assert_eq!(extended.code(), Some(502));
            assert!(matches!(*legacy, FtpError::Protocol(_)));
        }
        other => panic!("expected a negotiation error, got {:?}", other.map(|e| e.len())),
    }
}

#[tokio::test]
async fn test_bad_greeting_fails_dial() {
    let (addr, _uploads) = fake_server("421 Too many users.", |_| Step::Close).await;
    match ClientConn::dial(&addr).await {
        Err(FtpError::Status { code, message }) => {
            assert_eq!(code, 421);
            assert_eq!(message, "Too many users.");
        }
        Err(e) => panic!("unexpected error: {}", e),
        Ok(_) => panic!("dial accepted a 421 greeting"),
    }
}

fn rejects_utf8(line: &str) -> Step {
    match line {
        "FEAT" => Step::Reply("211-Features:\r\n UTF8\r\n MDTM\r\n211 End"),
        "OPTS UTF8 ON" => Step::Reply("501 Not today."),
        _ => Step::Reply("500 Unexpected."),
    }
}

#[tokio::test]
async fn test_rejected_utf8_fails_dial() {
    let (addr, _uploads) = fake_server("220 Fake ready.", rejects_utf8).await;
    let err = ClientConn::dial(&addr).await.err().unwrap();
    assert_eq!(err.code(), Some(501));
}

fn login_script(line: &str) -> Step {
    match line {
        "FEAT" => Step::Reply("211 No features"),
        "USER admin" => Step::Reply("230 Already logged in."),
        "USER bob" => Step::Reply("331 Password required."),
        "PASS wrong" => Step::Reply("530 Login incorrect."),
        "USER eve" => Step::Reply("530 Not allowed."),
        "TYPE I" => Step::Reply("200 Binary."),
        _ => Step::Reply("500 Unexpected."),
    }
}

#[tokio::test]
async fn test_login_outcomes() {
    let (addr, _uploads) = fake_server("220 Fake ready.", login_script).await;
    let mut conn = ClientConn::dial(&addr).await.unwrap();

    conn.login("admin", "ignored").await.unwrap();
    assert_eq!(conn.login("bob", "wrong").await.unwrap_err().code(), Some(530));
    match conn.login("eve", "x").await {
        Err(FtpError::Status { code, message }) => {
            assert_eq!(code, 530);
            assert_eq!(message, "Not allowed.");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

fn failing_store(line: &str) -> Step {
    match line {
        "FEAT" => Step::Reply("211 No features"),
        "EPSV" => Step::Reply("502 Command not implemented."),
        "PASV" => Step::Passive,
        "STOR full.bin" => Step::Receive("150 Go ahead.", "451 Disk full."),
        "RETR busy.bin" => Step::Reply("450 File busy."),
        "NOOP" => Step::Reply("200 OK."),
        _ => Step::Reply("500 Unexpected."),
    }
}

#[tokio::test]
async fn test_store_requires_confirmation() {
    let (addr, mut uploads) = fake_server("220 Fake ready.", failing_store).await;
    let mut conn = ClientConn::dial(&addr).await.unwrap();

    let err = conn
        .stor("full.bin", &mut &b"payload"[..])
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(451));
    assert_eq!(uploads.recv().await.unwrap(), b"payload");

    // The fake never accepts this data connection; the client must still
    // report the refusal and keep the control connection usable.
    assert_eq!(conn.retr("busy.bin").await.err().unwrap().code(), Some(450));
    conn.noop().await.unwrap();
}

#[tokio::test]
async fn test_unreachable_server() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    drop(listener);

    assert!(matches!(
        ClientConn::connect_anonymous(&addr).await,
        Err(FtpError::Connection(_))
    ));
}
