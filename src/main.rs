use anyhow::{Context, Result};
use eira::audio::{CpalMicrophone, RodioPlayer};
use eira::desktop::{SystemBrowser, SystemShortcuts};
use eira::integration::{AssistantConfig, SessionCoordinator};
use eira::intent::IntentRouter;
use eira::messages::{Transcript, DEFAULT_TRANSCRIPT_CAPACITY};
use eira::speech::{
    CaptureSession, SherpaSynthesizer, SpeechPipeline, Synthesizer, UnavailableSynthesizer,
    WhisperRecognizer,
};
use eira::ui::{self, RepaintSignal};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eira=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting EIRA voice assistant");

    let config = AssistantConfig::from_env();
    for warning in config.validate() {
        warn!("{}", warning);
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("eira-worker")
        .build()
        .context("failed to start async runtime")?;

    let repaint = RepaintSignal::new();
    let (log, transcript) = Transcript::channel(DEFAULT_TRANSCRIPT_CAPACITY);
    let log = log.with_waker(repaint.waker());

    let synthesizer: Arc<dyn Synthesizer> = match SherpaSynthesizer::start(config.synthesizer.clone())
    {
        Ok(synth) => Arc::new(synth),
        Err(e) => {
            warn!("Speech output disabled: {}", e);
            Arc::new(UnavailableSynthesizer::new(e.to_string()))
        }
    };
    let speech = Arc::new(SpeechPipeline::new(
        synthesizer,
        Arc::new(RodioPlayer::new()),
        config.speech.clone(),
    ));

    let mut router = IntentRouter::new(
        speech,
        log.clone(),
        Arc::new(SystemBrowser),
        Arc::new(SystemShortcuts),
    );
    if let Some(chat) = config.chat_client() {
        router = router.with_chat(chat);
    }
    if let Some(search) = config.search_client() {
        router = router.with_search(search);
    }

    let mut coordinator = SessionCoordinator::new(runtime.handle().clone(), Arc::new(router), log);
    match WhisperRecognizer::new(config.recognizer.clone()) {
        Ok(recognizer) => {
            let capture = CaptureSession::new(
                Arc::new(CpalMicrophone::new()),
                Arc::new(recognizer),
                config.capture.clone(),
            );
            coordinator = coordinator.with_capture(Arc::new(capture), config.listen_timeout);
        }
        Err(e) => warn!("Voice input disabled: {}", e),
    }

    coordinator.greet();

    ui::run(coordinator, transcript, repaint)
        .map_err(|e| anyhow::anyhow!("failed to open window: {}", e))?;

    info!("Shutting down");
    Ok(())
}
