// Copyright (C) 2025 Marcus L. Hanestad <marlhan@proton.me>
//
// This file is part of CastPlay.
//
// CastPlay is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// CastPlay is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with CastPlay.  If not, see <https://www.gnu.org/licenses/>.

use anyhow::Result;
use log::{debug, error, trace};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::coordinator::Coordinator;
use crate::{log_if_err, Event};

impl Coordinator {
    /// Drive the coordinator until [`Event::Quit`] or every sender is gone.
    pub async fn run_event_loop(mut self, mut event_rx: UnboundedReceiver<Event>) -> Result<()> {
        loop {
            let deadline = self.readiness_deadline();
            let timeout = async move {
                match deadline {
                    Some((generation, at)) => {
                        tokio::time::sleep_until(at).await;
                        generation
                    }
                    None => std::future::pending().await,
                }
            };

            tokio::select! {
                event = event_rx.recv() => {
                    let Some(event) = event else {
                        break;
                    };
                    trace!("Got event: {event:?}");
                    match self.handle_event(event) {
                        Ok(true) => break,
                        Err(err) => error!("Handle event error: {err}"),
                        _ => (),
                    }
                }
                generation = timeout => {
                    log_if_err!(self.handle_event(Event::ReadinessTimeout { generation }));
                }
            }
        }

        self.stop();
        self.teardown();
        debug!("Quitting");

        Ok(())
    }
}
