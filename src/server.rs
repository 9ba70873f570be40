use std::{
	convert::Infallible,
	net::SocketAddr,
	sync::{Arc, Mutex},
};

use hyper::{
	header,
	server::conn::AddrStream,
	service::{make_service_fn, service_fn},
	Body, Method, Request, Response, StatusCode,
};

use songlist::Queue;

use crate::wire::{self, AddSongs, ApiError, QueueSnapshot, RemoveSongs};

const QUEUE_PATH: &str = "/api/v1/queue";

#[derive(Debug, Clone)]
struct State {
	queue: Arc<Mutex<Queue<String>>>,
}

impl State {
	async fn route(self, req: Request<Body>) -> hyper::http::Result<Response<Body>> {
		let method = req.method().clone();
		let path = req.uri().path().to_owned();

		match (path.as_str(), &method) {
			(QUEUE_PATH, &Method::GET) => self.list().await,
			(QUEUE_PATH, &Method::POST) => self.add(req).await,
			(QUEUE_PATH, &Method::DELETE) => self.remove(req).await,
			(QUEUE_PATH, _) => Self::empty_status(StatusCode::METHOD_NOT_ALLOWED),
			(path, _) => Self::not_found(path),
		}
	}

	async fn list(self) -> hyper::http::Result<Response<Body>> {
		let snapshot = {
			let guard = self.queue.lock().expect("Error locking queue to list");
			QueueSnapshot {
				queue: guard
					.iter()
					.map(|(position, song)| (position.get(), song.clone()))
					.collect(),
			}
		};

		let body = serde_json::to_string(&snapshot).expect("Snapshot serializes");
		Response::builder()
			.header(header::CONTENT_TYPE, "application/json")
			.body(Body::from(body))
	}

	async fn add(self, req: Request<Body>) -> hyper::http::Result<Response<Body>> {
		let body: AddSongs = match wire::read_json(req.into_body()).await {
			Ok(body) => body,
			Err(e) => return Self::bad_request(e),
		};

		let added = body.song_ids.len();
		let len = {
			let mut guard = self.queue.lock().expect("Error locking queue to add");
			guard.enqueue_many(body.song_ids);
			guard.len()
		};
		log::info!("added {} songs, queue now holds {}", added, len);

		Response::builder()
			.status(StatusCode::CREATED)
			.body(Body::empty())
	}

	async fn remove(self, req: Request<Body>) -> hyper::http::Result<Response<Body>> {
		let parsed = wire::read_json::<RemoveSongs>(req.into_body())
			.await
			.and_then(RemoveSongs::into_pairs);
		let pairs = match parsed {
			Ok(pairs) => pairs,
			Err(e) => return Self::bad_request(e),
		};

		let requested = pairs.len();
		let removed = {
			let mut guard = self.queue.lock().expect("Error locking queue to remove");
			guard.dequeue_many(pairs)
		};
		// stale pairs are expected from retries; still succeed
		log::info!("removed {} of {} requested songs", removed, requested);

		Response::builder()
			.status(StatusCode::NO_CONTENT)
			.body(Body::empty())
	}

	fn bad_request(e: ApiError) -> hyper::http::Result<Response<Body>> {
		log::warn!("rejecting request: {}", e);

		let body = serde_json::json!({ "error": e.to_string() }).to_string();
		Response::builder()
			.status(StatusCode::BAD_REQUEST)
			.header(header::CONTENT_TYPE, "application/json")
			.body(Body::from(body))
	}

	fn not_found(path: &str) -> hyper::http::Result<Response<Body>> {
		log::debug!("no route for {}", path);
		Self::empty_status(StatusCode::NOT_FOUND)
	}

	fn empty_status(status: StatusCode) -> hyper::http::Result<Response<Body>> {
		Response::builder().status(status).body(Body::empty())
	}
}

#[derive(Debug)]
pub struct Server {
	state: State,
	addr: SocketAddr,
}

impl Server {
	pub fn new(queue: Arc<Mutex<Queue<String>>>, addr: SocketAddr) -> Self {
		Self {
			state: State { queue },
			addr,
		}
	}

	pub async fn run_loop(self) -> hyper::Result<()> {
		let state = self.state;
		let make_service = make_service_fn(move |_: &AddrStream| {
			let state = state.clone();

			let service = service_fn(move |req| state.clone().route(req));

			async move { Ok::<_, Infallible>(service) }
		});

		log::info!("listening on {}", self.addr);
		hyper::Server::bind(&self.addr).serve(make_service).await
	}
}
