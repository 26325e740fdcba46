use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::Arc;

use futures::stream;
use futures::Stream;
use parking_lot::Mutex;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::sync::oneshot;
use tonic::Request;
use tonic::Response;
use tonic::Status;
use tracing::debug;

use crate::proto::materialize::watch_permission_sets_service_server::WatchPermissionSetsService;
use crate::proto::materialize::watch_permission_sets_service_server::WatchPermissionSetsServiceServer;
use crate::proto::materialize::WatchPermissionSetsRequest;
use crate::proto::materialize::WatchPermissionSetsResponse;
use crate::proto::v1::permissions_service_server::PermissionsService;
use crate::proto::v1::permissions_service_server::PermissionsServiceServer;
use crate::proto::v1::RelationshipUpdate;
use crate::proto::v1::WriteRelationshipsRequest;
use crate::proto::v1::WriteRelationshipsResponse;
use crate::proto::v1::ZedToken;

type ResponseItem = std::result::Result<WatchPermissionSetsResponse, Status>;

/// One `WatchPermissionSets` call as seen by the server
#[derive(Debug, Clone)]
pub struct WatchCall {
    pub starting_after: Option<ZedToken>,
    pub authorization: Option<String>,
}

/// Authorization service double serving both APIs on one port.
///
/// Each watch call consumes the next script; the stream ends after the
/// script's last item. Without scripts left the stream stays open.
pub struct MockAuthzedService {
    scripts: Mutex<VecDeque<Vec<ResponseItem>>>,
    watch_calls: mpsc::UnboundedSender<WatchCall>,
    written: Mutex<Vec<RelationshipUpdate>>,
    written_at: String,
}

impl MockAuthzedService {
    pub fn new(
        scripts: Vec<Vec<ResponseItem>>
    ) -> (Arc<Self>, mpsc::UnboundedReceiver<WatchCall>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Arc::new(Self {
                scripts: Mutex::new(scripts.into()),
                watch_calls: tx,
                written: Mutex::new(Vec::new()),
                written_at: "GhUKEzE3MDAwMDAwMDA".to_string(),
            }),
            rx,
        )
    }

    pub fn written(&self) -> Vec<RelationshipUpdate> {
        self.written.lock().clone()
    }

    /// Binds an ephemeral local port and serves until `rx` fires.
    pub async fn mock_listener(
        service: Arc<Self>,
        rx: oneshot::Receiver<()>,
    ) -> std::result::Result<u16, Status> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| Status::internal(format!("Failed to bind: {e}")))?;
        let port = listener
            .local_addr()
            .map_err(|e| Status::internal(format!("Failed to bind: {e}")))?
            .port();
        debug!("starting mock authzed service:port={port}");

        tokio::spawn(async move {
            tonic::transport::Server::builder()
                .add_service(WatchPermissionSetsServiceServer::from_arc(service.clone()))
                .add_service(PermissionsServiceServer::from_arc(service))
                .serve_with_incoming_shutdown(
                    tokio_stream::wrappers::TcpListenerStream::new(listener),
                    async {
                        rx.await.ok();
                    },
                )
                .await
                .unwrap();
        });

        Ok(port)
    }
}

fn authorization(metadata: &tonic::metadata::MetadataMap) -> Option<String> {
    metadata
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

#[tonic::async_trait]
impl WatchPermissionSetsService for MockAuthzedService {
    type WatchPermissionSetsStream = Pin<Box<dyn Stream<Item = ResponseItem> + Send + 'static>>;

    async fn watch_permission_sets(
        &self,
        request: Request<WatchPermissionSetsRequest>,
    ) -> std::result::Result<Response<Self::WatchPermissionSetsStream>, Status> {
        let authorization = authorization(request.metadata());
        let starting_after = request.into_inner().optional_starting_after;
        let _ = self.watch_calls.send(WatchCall {
            starting_after,
            authorization,
        });

        let stream: Self::WatchPermissionSetsStream = match self.scripts.lock().pop_front() {
            Some(items) => Box::pin(stream::iter(items)),
            None => Box::pin(stream::pending::<ResponseItem>()),
        };
        Ok(Response::new(stream))
    }
}

#[tonic::async_trait]
impl PermissionsService for MockAuthzedService {
    async fn write_relationships(
        &self,
        request: Request<WriteRelationshipsRequest>,
    ) -> std::result::Result<Response<WriteRelationshipsResponse>, Status> {
        if authorization(request.metadata()).is_none() {
            return Err(Status::unauthenticated("missing bearer token"));
        }
        self.written.lock().extend(request.into_inner().updates);
        Ok(Response::new(WriteRelationshipsResponse {
            written_at: Some(ZedToken {
                token: self.written_at.clone(),
            }),
        }))
    }
}
