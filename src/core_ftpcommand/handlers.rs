use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::{
    cdup, cwd, dele, feat, list, mkd, noop, opts, pass, pwd, quit, rein, rest, retr, rmd, rnfr,
    rnto, size, stor, syst, type_, user,
};
use crate::core_network::pasv;
use crate::helpers::ControlWriter;
use crate::session::Session;
use crate::Config;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::Mutex as TokioMutex;

pub type CommandHandler = Box<
    dyn Fn(
            ControlWriter,
            Arc<Config>,
            Arc<TokioMutex<Session>>,
            String, // Arguments, rejoined with single spaces
        ) -> Pin<Box<dyn Future<Output = Result<(), std::io::Error>> + Send>>
        + Send
        + Sync,
>;

fn handler<F, Fut>(f: F) -> Arc<CommandHandler>
where
    F: Fn(ControlWriter, Arc<Config>, Arc<TokioMutex<Session>>, String) -> Fut
        + Send
        + Sync
        + 'static,
    Fut: Future<Output = Result<(), std::io::Error>> + Send + 'static,
{
    Arc::new(Box::new(move |writer, config, session, arg| {
        Box::pin(f(writer, config, session, arg))
    }))
}

pub fn initialize_command_handlers() -> HashMap<FtpCommand, Arc<CommandHandler>> {
    let mut handlers: HashMap<FtpCommand, Arc<CommandHandler>> = HashMap::new();

    handlers.insert(FtpCommand::USER, handler(user::handle_user_command));
    handlers.insert(FtpCommand::PASS, handler(pass::handle_pass_command));
    handlers.insert(FtpCommand::QUIT, handler(quit::handle_quit_command));
    handlers.insert(FtpCommand::REIN, handler(rein::handle_rein_command));
    handlers.insert(FtpCommand::NOOP, handler(noop::handle_noop_command));
    handlers.insert(FtpCommand::SYST, handler(syst::handle_syst_command));
    handlers.insert(FtpCommand::TYPE, handler(type_::handle_type_command));
    handlers.insert(FtpCommand::FEAT, handler(feat::handle_feat_command));
    handlers.insert(FtpCommand::OPTS, handler(opts::handle_opts_command));

    // Directory navigation
    handlers.insert(FtpCommand::PWD, handler(pwd::handle_pwd_command));
    handlers.insert(FtpCommand::CWD, handler(cwd::handle_cwd_command));
    handlers.insert(FtpCommand::CDUP, handler(cdup::handle_cdup_command));

    // Filesystem changes
    handlers.insert(FtpCommand::MKD, handler(mkd::handle_mkd_command));
    handlers.insert(FtpCommand::RMD, handler(rmd::handle_rmd_command));
    handlers.insert(FtpCommand::XRMD, handler(rmd::handle_rmd_command));
    handlers.insert(FtpCommand::DELE, handler(dele::handle_dele_command));
    handlers.insert(FtpCommand::RNFR, handler(rnfr::handle_rnfr_command));
    handlers.insert(FtpCommand::RNTO, handler(rnto::handle_rnto_command));
    handlers.insert(FtpCommand::SIZE, handler(size::handle_size_command));

    // Data channel negotiation and transfers
    handlers.insert(FtpCommand::PASV, handler(pasv::handle_pasv_command));
    handlers.insert(FtpCommand::EPSV, handler(pasv::handle_epsv_command));
    handlers.insert(FtpCommand::REST, handler(rest::handle_rest_command));
    handlers.insert(FtpCommand::LIST, handler(list::handle_list_command));
    handlers.insert(FtpCommand::NLST, handler(list::handle_nlst_command));
    handlers.insert(FtpCommand::RETR, handler(retr::handle_retr_command));
    handlers.insert(FtpCommand::STOR, handler(stor::handle_stor_command));

    handlers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_command_has_a_handler() {
        let handlers = initialize_command_handlers();
        for token in [
            "USER", "PASS", "QUIT", "REIN", "PWD", "CWD", "CDUP", "LIST", "NLST", "NOOP", "MKD",
            "RMD", "XRMD", "DELE", "RNFR", "RNTO", "RETR", "STOR", "REST", "SIZE", "PASV", "EPSV",
            "FEAT", "OPTS", "SYST", "TYPE",
        ] {
            let command = FtpCommand::parse(token).unwrap();
            assert!(handlers.contains_key(&command), "no handler for {}", token);
        }
    }
}
