/*! The worker command line (spec.md §6): `<stage_binary> Index <shard_id>
<key_client_num> <map_client_num> <request_type> <data_handler_name>
<work_dir> <data_dir> <div_start> <div_end> <max_key_bytes> <max_map_bytes>
<listen_port> <file_byte_offset> <tuple_bytes> <data_type>`. A missing
optional is the literal string `NULL`.
!*/
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct WorkerCommand {
    pub shard_id: u32,
    pub key_client_num: u32,
    pub map_client_num: u32,
    pub request_type: String,
    pub data_handler_name: Option<String>,
    pub work_dir: PathBuf,
    pub data_dir: PathBuf,
    pub div_start: u32,
    pub div_end: u32,
    pub max_key_bytes: u32,
    pub max_map_bytes: u32,
    pub listen_port: u16,
    pub file_byte_offset: u64,
    pub tuple_bytes: u64,
    pub data_type: String,
}

impl WorkerCommand {
    /// Renders the decimal, space-separated argument list a worker
    /// process is invoked with (the leading `Index` literal included).
    pub fn to_args(&self) -> Vec<String> {
        vec![
            "Index".to_string(),
            self.shard_id.to_string(),
            self.key_client_num.to_string(),
            self.map_client_num.to_string(),
            self.request_type.clone(),
            self.data_handler_name.clone().unwrap_or_else(|| "NULL".to_string()),
            self.work_dir.display().to_string(),
            self.data_dir.display().to_string(),
            self.div_start.to_string(),
            self.div_end.to_string(),
            self.max_key_bytes.to_string(),
            self.max_map_bytes.to_string(),
            self.listen_port.to_string(),
            self.file_byte_offset.to_string(),
            self.tuple_bytes.to_string(),
            self.data_type.clone(),
        ]
    }

    /// Parses a worker's `argv[1..]` back into a command. Inverse of
    /// [`to_args`], used both by the worker binary's `main` and by tests
    /// that check the dispatch contract round-trips.
    pub fn from_args(args: &[String]) -> Result<Self, crate::error::Error> {
        if args.len() != 16 || args[0] != "Index" {
            return Err(crate::error::Error::Custom(format!(
                "expected 16 args starting with Index, got {args:?}"
            )));
        }
        let parse_u32 = |s: &str| -> Result<u32, crate::error::Error> {
            s.parse().map_err(|_| crate::error::Error::Custom(format!("bad integer: {s}")))
        };
        let parse_u64 = |s: &str| -> Result<u64, crate::error::Error> {
            s.parse().map_err(|_| crate::error::Error::Custom(format!("bad integer: {s}")))
        };
        Ok(WorkerCommand {
            shard_id: parse_u32(&args[1])?,
            key_client_num: parse_u32(&args[2])?,
            map_client_num: parse_u32(&args[3])?,
            request_type: args[4].clone(),
            data_handler_name: if args[5] == "NULL" { None } else { Some(args[5].clone()) },
            work_dir: PathBuf::from(&args[6]),
            data_dir: PathBuf::from(&args[7]),
            div_start: parse_u32(&args[8])?,
            div_end: parse_u32(&args[9])?,
            max_key_bytes: parse_u32(&args[10])?,
            max_map_bytes: parse_u32(&args[11])?,
            listen_port: args[12]
                .parse()
                .map_err(|_| crate::error::Error::Custom(format!("bad port: {}", args[12])))?,
            file_byte_offset: parse_u64(&args[13])?,
            tuple_bytes: parse_u64(&args[14])?,
            data_type: args[15].clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_args() {
        let cmd = WorkerCommand {
            shard_id: 3,
            key_client_num: 16,
            map_client_num: 16,
            request_type: "DistributeKeys".to_string(),
            data_handler_name: None,
            work_dir: PathBuf::from("/work"),
            data_dir: PathBuf::from("/data"),
            div_start: 0,
            div_end: 16,
            max_key_bytes: 5,
            max_map_bytes: 8,
            listen_port: 3000,
            file_byte_offset: 1024,
            tuple_bytes: 4096,
            data_type: "int".to_string(),
        };
        let args = cmd.to_args();
        assert_eq!(args[5], "NULL");
        let back = WorkerCommand::from_args(&args).unwrap();
        assert_eq!(back.shard_id, cmd.shard_id);
        assert_eq!(back.request_type, cmd.request_type);
        assert_eq!(back.data_handler_name, None);
        assert_eq!(back.listen_port, cmd.listen_port);
    }
}
