mod health_record_test;
