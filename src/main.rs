use std::{
	env,
	net::SocketAddr,
	sync::{Arc, Mutex},
};

use songlist::Queue;

mod server;
mod wire;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
	env_logger::init();

	let port: u16 = match env::var("PORT") {
		Ok(port) => port.parse()?,
		Err(_) => 3000,
	};

	// One queue per process, owned by the server; every request serializes
	// on this mutex for the duration of its queue operation.
	let queue = Arc::new(Mutex::new(Queue::new()));

	let server = server::Server::new(queue, SocketAddr::from(([0, 0, 0, 0], port)));
	server.run_loop().await?;

	Ok(())
}
