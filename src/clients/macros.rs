/// Generate client methods with oneshot channel boilerplate and automatic tracing.
///
/// Send and receive failures become `BoardError::ActorCommunication`; the
/// service's own error is passed through unchanged.
macro_rules! client_method {
    ($client:ty => fn $method:ident($($param:ident: $param_type:ty),*) -> $return_type:ty as $request:ident::$variant:ident) => {
        impl $client {
            #[tracing::instrument(skip(self))]
            pub async fn $method(&self, $($param: $param_type),*) -> Result<$return_type, $crate::error::BoardError> {
                tracing::debug!("Sending request");
                let (respond_to, response) = tokio::sync::oneshot::channel();
                self.sender.send($request::$variant {
                    $($param,)*
                    respond_to,
                }).await.map_err(|_| $crate::error::BoardError::ActorCommunication("Actor closed".to_string()))?;

                response.await.map_err(|_| $crate::error::BoardError::ActorCommunication("Actor dropped".to_string()))?
            }
        }
    };
}
