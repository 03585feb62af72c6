// Copyright 2025 Crrow
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// Turns an error into a structured `error` event for best-effort work
/// whose failure must not stop the caller.
pub trait ResultExt<E> {
    type Ok;

    /// Logs the error with `action` describing what was attempted.
    fn log_err(self, action: &str) -> Option<Self::Ok>;
}

impl<T, E> ResultExt<E> for Result<T, E>
where
    E: std::fmt::Display,
{
    type Ok = T;

    #[track_caller]
    fn log_err(self, action: &str) -> Option<T> {
        let caller = std::panic::Location::caller();
        self.map_err(|error| {
            tracing::error!(
                %error,
                action,
                caller.file = caller.file(),
                caller.line = caller.line(),
                "best-effort step failed"
            );
        })
        .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::ResultExt;

    #[test]
    fn log_err_keeps_ok_and_drops_err() {
        assert_eq!(Ok::<_, String>(3).log_err("count"), Some(3));
        assert_eq!(Err::<u8, _>("disk full").log_err("write"), None);
    }
}
