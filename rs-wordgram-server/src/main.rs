use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use actix_web::{get, middleware, put, web, App, HttpResponse, HttpServer, Responder};
use log::{error, info, warn};
use serde::Deserialize;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rs_wordgram_core::config::WordgramConfig;
use rs_wordgram_core::corpus::{list_corpora, load_corpus, tokenize};
use rs_wordgram_core::{build_models, generate, Context, Error, ProbabilityTable};

/// Struct representing query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	window_size: Option<usize>,
	num_words: Option<usize>,
	seed: Option<String>, // -> random (default) or custom:<words>
	rng_seed: Option<u64>,
}

#[derive(Deserialize)]
struct LoadQuery {
	name: Option<String>,
	sizes: Option<String>,
}

/// Seed strategy requested by a client.
enum StartSeed {
	Random,
	Custom(Context),
}

/// Trained models of the loaded corpus, keyed by window size.
struct SharedData {
	corpus: Option<String>,
	models: BTreeMap<usize, ProbabilityTable>,
}

impl GenerateParams {
	/// Determines the starting seed strategy for sequence generation.
	fn start_seed(&self) -> Result<StartSeed, String> {
		match &self.seed {
			None => Ok(StartSeed::Random),
			Some(s) if s.to_lowercase() == "random" => Ok(StartSeed::Random),
			Some(s) if s.to_lowercase().starts_with("custom:") => {
				let words = tokenize(&s["custom:".len()..]);
				if words.is_empty() {
					Err("Custom seed cannot be empty".into())
				} else {
					Ok(StartSeed::Custom(Context::new(words)))
				}
			}
			Some(_) => Err("Seed must be 'random' or start with 'custom:'".into()),
		}
	}

	fn rng(&self) -> StdRng {
		match self.rng_seed {
			Some(seed) => StdRng::seed_from_u64(seed),
			None => StdRng::from_os_rng(),
		}
	}
}

/// Maps a library error to an HTTP response.
fn error_response(e: &Error) -> HttpResponse {
	match e {
		Error::UnknownContext { .. } => HttpResponse::NotFound().body(e.to_string()),
		Error::ContextSizeMismatch { .. } | Error::InvalidWindowSize { .. } | Error::InvalidConfig(_) => {
			HttpResponse::BadRequest().body(e.to_string())
		}
		_ => {
			error!("{e}");
			HttpResponse::InternalServerError().body(e.to_string())
		}
	}
}

/// Parses a comma separated list of window sizes.
fn parse_sizes(raw: &str) -> Result<Vec<usize>, String> {
	raw.split(',')
		.map(str::trim)
		.filter(|s| !s.is_empty())
		.map(|s| s.parse::<usize>().map_err(|_| format!("Invalid window size '{s}'")))
		.collect()
}

/// Loads a corpus file and trains every requested window size.
fn train(path: &Path, sizes: &[usize]) -> Result<BTreeMap<usize, ProbabilityTable>, Error> {
	let tokens = load_corpus(path)?;
	build_models(&tokens, sizes)
}

/// Resolves a corpus name to its file inside `data_dir`.
///
/// Only names listed by `list_corpora` are accepted, so a request can never
/// reach a file outside the data folder.
fn corpus_path(data_dir: &str, name: &str) -> Result<PathBuf, HttpResponse> {
	if name.contains(['/', '\\']) || name.contains("..") {
		return Err(HttpResponse::BadRequest().body(format!("Invalid corpus name '{name}'")));
	}

	let known = list_corpora(data_dir).map_err(|e| error_response(&e))?;
	if !known.iter().any(|known| known == name) {
		return Err(HttpResponse::NotFound().body(format!("No corpus named '{name}'")));
	}

	Ok(Path::new(data_dir).join(format!("{name}.txt")))
}

/// HTTP GET endpoint `/v1/generate`
///
/// Generates `num_words` words with the model of `window_size` tokens.
/// Returns the generated text as the response body.
#[get("/v1/generate")]
async fn get_generated(
	data: web::Data<RwLock<SharedData>>,
	config: web::Data<WordgramConfig>,
	query: web::Query<GenerateParams>,
) -> impl Responder {
	let window_size = query.window_size.unwrap_or(config.window_size());
	let num_words = query.num_words.unwrap_or(config.num_words());

	let start_seed = match query.start_seed() {
		Ok(s) => s,
		Err(e) => return HttpResponse::BadRequest().body(e),
	};

	let shared_data = match data.read() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let table = match shared_data.models.get(&window_size) {
		Some(table) => table,
		None => return HttpResponse::NotFound().body(format!("No {window_size}-token model loaded")),
	};

	let mut rng = query.rng();
	let seed = match start_seed {
		StartSeed::Custom(context) => context,
		StartSeed::Random => match table.random_context(&mut rng) {
			Some(context) => context,
			None => return HttpResponse::NotFound().body("Model has no context"),
		},
	};

	match generate(&seed, num_words, table, window_size, &mut rng) {
		Ok(result) => HttpResponse::Ok().body(result.to_string()),
		Err(e) => error_response(&e),
	}
}

#[get("/v1/corpora")]
async fn get_corpora(config: web::Data<WordgramConfig>) -> impl Responder {
	match list_corpora(&config.data_dir) {
		Ok(names) => HttpResponse::Ok().body(names.join("\n")),
		Err(e) => error_response(&e),
	}
}

#[get("/v1/loaded_models")]
async fn get_loaded_models(data: web::Data<RwLock<SharedData>>) -> impl Responder {
	let shared_data = match data.read() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	let Some(corpus) = &shared_data.corpus else {
		return HttpResponse::Ok().body("");
	};
	let sizes: Vec<String> = shared_data.models.keys().map(usize::to_string).collect();
	HttpResponse::Ok().body(format!("{corpus}: {}", sizes.join(",")))
}

#[put("/v1/load_corpus")]
async fn put_corpus(
	data: web::Data<RwLock<SharedData>>,
	config: web::Data<WordgramConfig>,
	query: web::Query<LoadQuery>,
) -> impl Responder {
	let name = match &query.name {
		Some(s) if !s.trim().is_empty() => s.trim().to_owned(),
		_ => return HttpResponse::BadRequest().body("Missing or empty corpus name"),
	};

	let sizes = match query.sizes.as_deref().map(parse_sizes) {
		None => config.sizes.clone(),
		Some(Ok(sizes)) if !sizes.is_empty() => sizes,
		Some(Ok(_)) => return HttpResponse::BadRequest().body("Empty window size list"),
		Some(Err(e)) => return HttpResponse::BadRequest().body(e),
	};

	let path = match corpus_path(&config.data_dir, &name) {
		Ok(path) => path,
		Err(response) => return response,
	};

	// Train off the worker thread and before locking, readers keep the
	// previous models meanwhile
	let models = match web::block(move || train(&path, &sizes)).await {
		Ok(Ok(models)) => models,
		Ok(Err(e)) => return error_response(&e),
		Err(e) => {
			error!("training task failed: {e}");
			return HttpResponse::InternalServerError().body("Training failed");
		}
	};
	info!("corpus '{name}' trained");

	let mut shared_data = match data.write() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	shared_data.corpus = Some(name);
	shared_data.models = models;

	HttpResponse::Ok().body("Corpus loaded successfully")
}

/// Main entry point for the server.
///
/// Reads the optional JSON config given as first argument, trains the
/// default corpus when it exists and serves on `bind:port`.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::init();

	let args: Vec<String> = env::args().collect();
	let config = match WordgramConfig::load(args.get(1).map(String::as_str)) {
		Ok(config) => config,
		Err(e) => return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())),
	};

	let mut shared_data = SharedData { corpus: None, models: BTreeMap::new() };
	if config.corpus.exists() {
		match train(&config.corpus, &config.sizes) {
			Ok(models) => {
				shared_data.corpus = config.corpus.file_stem().map(|s| s.to_string_lossy().to_string());
				shared_data.models = models;
			}
			Err(e) => warn!("default corpus not loaded: {e}"),
		}
	}

	let address = (config.bind.clone(), config.port);
	info!("listening on {}:{}", address.0, address.1);

	let shared_model = web::Data::new(RwLock::new(shared_data));
	let shared_config = web::Data::new(config);

	HttpServer::new(move || {
		App::new()
			.wrap(middleware::Logger::default())
			.app_data(shared_model.clone())
			.app_data(shared_config.clone())
			.service(get_generated)
			.service(get_corpora)
			.service(put_corpus)
			.service(get_loaded_models)
	})
		.bind(address)?
		.run()
		.await
}
