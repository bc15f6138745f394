use crate::constants::status;
use crate::core_ftpcommand::utils::require_arg;
use crate::core_network::data_conn::DataConn;
use crate::helpers::{send_reply, send_status, ControlWriter};
use crate::session::Session;
use crate::Config;
use std::io::SeekFrom;
use std::path::Path;
use std::sync::Arc;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tokio::sync::Mutex;

/// Which side of a STOR copy failed.
enum CopyError {
    Read(std::io::Error),
    Write(std::io::Error),
}

/// Handles the STOR (Store File) FTP command.
///
/// Bytes from the session's data connection replace the target file, or,
/// after REST, overwrite it from the restart offset on. A target that
/// cannot be opened answers 450, failures on the data side answer 426 and
/// failures writing the file answer 451.
///
/// # Arguments
///
/// * `writer` - The control connection's write half.
/// * `config` - Server configuration; supplies the copy buffer size.
/// * `session` - The session owning the data connection.
/// * `arg` - The target path.
pub async fn handle_stor_command(
    writer: ControlWriter,
    config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    let mut session = session.lock().await;
    let offset = session.restart_offset.take().unwrap_or(0);
    if !require_arg(&writer, &session, "STOR", &arg).await? {
        session.close_data_conn().await;
        return Ok(());
    }

    let Some(mut conn) = session.data_conn.take() else {
        session.logger.warn("STOR without a data connection.");
        return send_status(&writer, &session.logger, status::CANNOT_OPEN_DATA_CONNECTION).await;
    };

    let target = session.resolve(&arg);
    send_reply(
        &writer,
        &session.logger,
        status::ABOUT_TO_SEND,
        "Data transfer starting.",
    )
    .await?;

    let mut file = match open_target(&target.real_path, offset).await {
        Ok(file) => file,
        Err(e) => {
            session
                .logger
                .error(format_args!("Failed to open {}: {}", target.virtual_path, e));
            let _ = conn.shutdown().await;
            return send_reply(
                &writer,
                &session.logger,
                status::FILE_ACTION_IGNORED,
                e.to_string(),
            )
            .await;
        }
    };

    let outcome = copy_to_file(&mut conn, &mut file, config.upload_buffer_size()).await;
    if let Err(e) = conn.shutdown().await {
        session
            .logger
            .debug(format_args!("Error shutting down data connection: {}", e));
    }
    drop(conn);

    match outcome {
        Ok(received) => {
            session.logger.info(format_args!(
                "Stored {} ({} bytes at offset {})",
                target.virtual_path, received, offset
            ));
            send_reply(
                &writer,
                &session.logger,
                status::CLOSING_DATA_CONNECTION,
                format!("OK, received {} bytes.", received),
            )
            .await
        }
        Err(CopyError::Read(e)) => {
            session
                .logger
                .error(format_args!("Error reading from data connection: {}", e));
            send_status(&writer, &session.logger, status::TRANSFER_ABORTED).await
        }
        Err(CopyError::Write(e)) => {
            session
                .logger
                .error(format_args!("Error writing {}: {}", target.virtual_path, e));
            send_status(&writer, &session.logger, status::LOCAL_ERROR).await
        }
    }
}

async fn open_target(path: &Path, offset: u64) -> Result<File, std::io::Error> {
    if offset == 0 {
        return File::create(path).await;
    }

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .await?;
    file.set_len(offset).await?;
    file.seek(SeekFrom::Start(offset)).await?;
    Ok(file)
}

async fn copy_to_file(
    conn: &mut Box<dyn DataConn>,
    file: &mut File,
    buffer_size: usize,
) -> Result<u64, CopyError> {
    let mut buffer = vec![0; buffer_size.max(1)];
    let mut received = 0u64;

    loop {
        let n = conn.read(&mut buffer).await.map_err(CopyError::Read)?;
        if n == 0 {
            break;
        }
        file.write_all(&buffer[..n])
            .await
            .map_err(CopyError::Write)?;
        received += n as u64;
    }

    file.flush().await.map_err(CopyError::Write)?;
    Ok(received)
}
