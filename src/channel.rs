use async_trait::async_trait;
use tokio::sync::mpsc;

/// The sending side of a multiple-producer channel.
#[async_trait]
pub trait MpSender: Clone {
    /// The type of messages sent along the channel.
    type Message;

    /// The type of error that can occur when sending a message along the
    /// channel.
    type Error;

    /// Attempts to send a message on the channel.
    async fn send(&self, msg: Self::Message) -> Result<(), Self::Error>;
}

#[async_trait]
impl<T> MpSender for mpsc::UnboundedSender<T>
where
    T: Send,
{
    type Message = T;
    type Error = mpsc::error::SendError<T>;

    async fn send(&self, msg: T) -> Result<(), Self::Error> {
        mpsc::UnboundedSender::send(self, msg)
    }
}
